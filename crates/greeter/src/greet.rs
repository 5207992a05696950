//! The greeting callable and its declared signature.

use std::io::{self, Write};
use std::thread;
use std::time::Duration;

use guinputs::{Arguments, FormError, Param, Signature};

pub const CALLABLE: &str = "cli";

#[derive(Debug, Clone, PartialEq)]
pub struct Greeting {
    pub names: Vec<String>,
    pub comma: bool,
    pub times: i64,
    pub delay: f64,
    pub greeting: String,
}

impl Greeting {
    pub fn signature() -> Signature {
        Signature::new(CALLABLE)
            .param(Param::of::<Vec<String>>("names"))
            .param(Param::of::<bool>("comma").default(true))
            .param(Param::of::<i64>("times").default(1))
            .param(Param::of::<f64>("delay").default(0.0))
            .param(Param::of::<String>("greeting").default("Hello"))
    }

    pub fn from_arguments(args: &Arguments) -> Result<Self, FormError> {
        Ok(Self {
            names: args.named("names")?,
            comma: args.named("comma")?,
            times: args.named("times")?,
            delay: args.named("delay")?,
            greeting: args.named("greeting")?,
        })
    }

    fn line(&self, name: &str) -> String {
        if self.comma {
            format!("{}, {name}", self.greeting)
        } else {
            format!("{} {name}", self.greeting)
        }
    }

    /// Every line in output order; empty for a non-positive `times`.
    pub fn lines(&self) -> impl Iterator<Item = String> + '_ {
        (0..self.times.max(0)).flat_map(move |_| self.names.iter().map(|name| self.line(name)))
    }

    /// Write each line, pausing `delay` seconds after it.
    pub fn write_to(&self, out: &mut impl Write) -> io::Result<()> {
        let pause = Duration::try_from_secs_f64(self.delay).unwrap_or_default();
        for line in self.lines() {
            writeln!(out, "{line}")?;
            out.flush()?;
            if !pause.is_zero() {
                thread::sleep(pause);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use guinputs::Value;
    use pretty_assertions::assert_eq;

    fn greeting(comma: bool, times: i64) -> Greeting {
        Greeting {
            names: vec!["Ann".into(), "Bob".into()],
            comma,
            times,
            delay: 0.0,
            greeting: "Hello".into(),
        }
    }

    #[test]
    fn lines_repeat_per_time() {
        let lines: Vec<_> = greeting(true, 2).lines().collect();
        assert_eq!(
            lines,
            ["Hello, Ann", "Hello, Bob", "Hello, Ann", "Hello, Bob"]
        );
    }

    #[test]
    fn without_comma_and_with_negative_times() {
        assert_eq!(greeting(false, 1).lines().next().as_deref(), Some("Hello Ann"));
        assert_eq!(greeting(true, -3).lines().count(), 0);
    }

    #[test]
    fn negative_delay_does_not_sleep_or_panic() {
        let mut g = greeting(true, 1);
        g.delay = -1.0;
        let mut out = Vec::new();
        g.write_to(&mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "Hello, Ann\nHello, Bob\n");
    }

    #[test]
    fn reads_typed_arguments() {
        let args = Arguments {
            args: vec![],
            kwargs: [
                ("names", Value::from(vec!["Cy"])),
                ("comma", Value::Bool(false)),
                ("times", Value::Int(2)),
                ("delay", Value::Float(0.0)),
                ("greeting", Value::from("Hi")),
            ]
            .into_iter()
            .map(|(k, v)| (k.to_string(), v))
            .collect(),
        };
        let g = Greeting::from_arguments(&args).unwrap();
        assert_eq!(g.names, vec!["Cy".to_string()]);
        assert_eq!(g.lines().collect::<Vec<_>>(), ["Hi Cy", "Hi Cy"]);
    }
}
