use std::path::PathBuf;

use anyhow::Result;
use tracing::{debug, info};

use crate::form::FieldKey;
use crate::router::HandlerContext;
use crate::toolkit::{FieldValue, WindowId};
use crate::value::Value;

/// Run the toolkit's file chooser for a path field.
///
/// The choice is stored for `key` and shown next to the trigger button of
/// `window`. A cancelled (or empty) choice leaves the previous one in place.
pub fn choose_file(
    cx: &mut HandlerContext<'_>,
    window: WindowId,
    key: &FieldKey,
) -> Result<Option<PathBuf>> {
    let path = match cx.toolkit.open_file_dialog()? {
        Some(path) if !path.as_os_str().is_empty() => path,
        _ => {
            debug!(field = %key, "file dialog cancelled");
            return Ok(None);
        }
    };

    cx.store().set(key, Value::Path(path.clone()));
    cx.toolkit.update(
        window,
        &key.display_key(),
        FieldValue::Text(path.display().to_string()),
    )?;
    info!(field = %key, path = %path.display(), "file chosen");
    Ok(Some(path))
}
