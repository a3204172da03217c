//! Image fit modes for the detail preview.

use ratatui::layout::Rect;
use std::str::FromStr;

/// How an image is scaled inside its display bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FitMode {
    /// Fill the bounds, keep the aspect ratio, crop the overflow.
    #[default]
    Cover,
    /// Fit inside the bounds, keep the aspect ratio, letterbox the rest.
    Contain,
    /// Fill the bounds, ignore the aspect ratio.
    Stretch,
}

impl FitMode {
    pub const ALL: [FitMode; 3] = [FitMode::Cover, FitMode::Contain, FitMode::Stretch];

    pub fn as_str(self) -> &'static str {
        match self {
            FitMode::Cover => "cover",
            FitMode::Contain => "contain",
            FitMode::Stretch => "stretch",
        }
    }

    pub fn next(self) -> Self {
        match self {
            FitMode::Cover => FitMode::Contain,
            FitMode::Contain => FitMode::Stretch,
            FitMode::Stretch => FitMode::Cover,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            FitMode::Cover => FitMode::Stretch,
            FitMode::Contain => FitMode::Cover,
            FitMode::Stretch => FitMode::Contain,
        }
    }

    /// Where an image with aspect `aspect` (width, height, in cells) lands inside `area`.
    pub fn place(self, area: Rect, aspect: (u16, u16)) -> Placement {
        let (aw, ah) = (aspect.0.max(1) as u32, aspect.1.max(1) as u32);
        match self {
            FitMode::Stretch => Placement {
                rect: area,
                cropped: false,
            },
            FitMode::Cover => {
                // Scaled image covers the area; it is cropped unless the ratios match.
                let cropped = area.width as u32 * ah != area.height as u32 * aw;
                Placement {
                    rect: area,
                    cropped,
                }
            }
            FitMode::Contain => {
                let (w, h) = (area.width as u32, area.height as u32);
                let (fit_w, fit_h) = if w * ah <= h * aw {
                    (w, w * ah / aw)
                } else {
                    (h * aw / ah, h)
                };
                let fit_w = fit_w.min(w) as u16;
                let fit_h = fit_h.min(h) as u16;
                Placement {
                    rect: Rect::new(
                        area.x + (area.width - fit_w) / 2,
                        area.y + (area.height - fit_h) / 2,
                        fit_w,
                        fit_h,
                    ),
                    cropped: false,
                }
            }
        }
    }
}

impl FromStr for FitMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "cover" => Ok(FitMode::Cover),
            "contain" => Ok(FitMode::Contain),
            "stretch" => Ok(FitMode::Stretch),
            other => Err(format!("unknown fit mode: {}", other)),
        }
    }
}

/// Result of [`FitMode::place`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    pub rect: Rect,
    /// Part of the image falls outside `rect`.
    pub cropped: bool,
}
