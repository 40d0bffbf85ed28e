use logbook_types::{ColorMode, Rgba};

use crate::error::UnknownSeverity;
use crate::registry::LevelRegistry;
use crate::store::RecordItem;

/// Text color forced onto light backgrounds
const DARK_TEXT: Rgba = Rgba {
    r: 42,
    g: 42,
    b: 42,
    a: 100,
};

/// Text color forced onto dark backgrounds
const LIGHT_TEXT: Rgba = Rgba {
    r: 212,
    g: 212,
    b: 212,
    a: 100,
};

/// Background lightness above which dark text is used
const READABLE_LIGHTNESS_CUTOFF: f32 = 0.3;

/// Assign or clear an item's color slots for the given mode
///
/// Both slots are cleared first, so reapplying any mode is idempotent and an
/// unknown severity always leaves the item uncolored.
pub(crate) fn apply(
    item: &mut RecordItem,
    mode: ColorMode,
    registry: &LevelRegistry,
    readable_text: bool,
) -> Result<(), UnknownSeverity> {
    item.foreground = None;
    item.background = None;

    match mode {
        ColorMode::Disabled => Ok(()),
        ColorMode::ForegroundTint => {
            item.foreground = Some(registry.color_of(item.record.severity)?);
            Ok(())
        }
        ColorMode::BackgroundTint => {
            let color = registry.color_of(item.record.severity)?;
            if readable_text {
                item.foreground = Some(readable_text_for(color));
            }
            item.background = Some(color);
            Ok(())
        }
    }
}

/// Pick a contrasting text color for a background fill
fn readable_text_for(background: Rgba) -> Rgba {
    if background.lightness() > READABLE_LIGHTNESS_CUTOFF {
        DARK_TEXT
    } else {
        LIGHT_TEXT
    }
}
