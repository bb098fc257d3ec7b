use crate::utils::*;
use serde::{Deserialize, Serialize};

/// Stroke and fill colors for one rendering of the lock.
#[derive(Copy, Clone, Debug, PartialEq)]
pub(crate) struct Palette {
    /// Fill of a ring that is part of the visible pattern.
    pub dot: &'static str,
    /// Idle rings and the press halo.
    pub dim: &'static str,
    /// The connecting line.
    pub line: &'static str,
    /// Replaces the other colors while a wrong pattern is shown.
    pub error: &'static str,
}

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub(crate) enum Theme {
    Light,
    Dark,
}

impl Theme {
    pub const ATTR_NAME: &'static str = "data-theme";

    pub(crate) const fn scheme(self) -> &'static str {
        use Theme::*;
        match self {
            Light => "light",
            Dark => "dark",
        }
    }

    pub(crate) const fn toggled(self) -> Self {
        use Theme::*;
        match self {
            Light => Dark,
            Dark => Light,
        }
    }

    pub(crate) const fn palette(self) -> Palette {
        use Theme::*;
        match self {
            Light => Palette {
                dot: "#263238",
                dim: "rgba(38, 50, 56, 0.45)",
                line: "rgba(38, 50, 56, 0.5)",
                error: "#d32f2f",
            },
            Dark => Palette {
                dot: "#f5f5f5",
                dim: "rgba(245, 245, 245, 0.45)",
                line: "rgba(245, 245, 245, 0.5)",
                error: "#ef5350",
            },
        }
    }

    fn update_html(theme: Option<Self>) {
        use gloo::utils::document;
        let html = document()
            .query_selector("html")
            .expect("query must be correct")
            .expect("must have html element");
        if let Some(theme) = theme {
            let scheme = theme.scheme();
            log::debug!("theme-scheme: {}", scheme);
            if let Err(err) = html.set_attribute(Self::ATTR_NAME, scheme) {
                log::error!("failed to set theme: {:?}", err);
            }
        } else {
            log::debug!("no theme preference");
            if let Err(err) = html.remove_attribute(Self::ATTR_NAME) {
                log::error!("failed to set theme: {:?}", err);
            }
        }
    }

    pub(crate) fn init() {
        Self::update_html(LocalOrDefault::local_or_default());
    }

    pub(crate) fn apply(theme: Option<Self>) {
        theme.local_save();
        Self::update_html(theme);
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::Dark
    }
}

impl StorageKey for Theme {
    const KEY: &'static str = "patlock:theme";
}
