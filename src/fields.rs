//! Enumerations and field types shared by the entity records.
//!
//! This module defines the task status keys that drive the kanban columns and
//! the image kinds accepted by the file inputs of the entity forms.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Task status, one kanban column per variant.
///
/// The serialized form is the lowercase column key used in storage
/// (`todo`, `inprogress`, `needtest`, `completed`, `reopen`).
#[derive(Debug, Clone, Copy, Serialize, Deserialize, ValueEnum, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    #[default]
    #[value(name = "todo")]
    Todo,
    #[value(name = "inprogress")]
    InProgress,
    #[value(name = "needtest")]
    NeedTest,
    #[value(name = "completed")]
    Completed,
    #[value(name = "reopen")]
    Reopen,
}

impl Status {
    /// Board column order.
    pub const ALL: [Status; 5] = [
        Status::Todo,
        Status::InProgress,
        Status::NeedTest,
        Status::Completed,
        Status::Reopen,
    ];

    /// Storage key of the status.
    pub fn key(self) -> &'static str {
        match self {
            Status::Todo => "todo",
            Status::InProgress => "inprogress",
            Status::NeedTest => "needtest",
            Status::Completed => "completed",
            Status::Reopen => "reopen",
        }
    }

    /// Column heading shown on the board.
    pub fn label(self) -> &'static str {
        match self {
            Status::Todo => "Need to Do",
            Status::InProgress => "In Progress",
            Status::NeedTest => "Need for Test",
            Status::Completed => "Completed",
            Status::Reopen => "Re-open",
        }
    }

    /// Position of the status in [`Status::ALL`].
    pub fn column_index(self) -> usize {
        match self {
            Status::Todo => 0,
            Status::InProgress => 1,
            Status::NeedTest => 2,
            Status::Completed => 3,
            Status::Reopen => 4,
        }
    }

    /// Parse a storage key back into a status.
    pub fn from_key(key: &str) -> Option<Status> {
        Status::ALL.into_iter().find(|s| s.key() == key)
    }
}

/// Image formats accepted by the file inputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageKind {
    Png,
    Jpeg,
    Gif,
}

impl ImageKind {
    /// Every accepted kind, used as the default file-type allow-list.
    pub const ALL: [ImageKind; 3] = [ImageKind::Png, ImageKind::Jpeg, ImageKind::Gif];

    /// MIME type of the image kind.
    pub fn mime(self) -> &'static str {
        match self {
            ImageKind::Png => "image/png",
            ImageKind::Jpeg => "image/jpeg",
            ImageKind::Gif => "image/gif",
        }
    }

    /// Detect the kind from a file extension (case-insensitive).
    pub fn from_extension(ext: &str) -> Option<ImageKind> {
        match ext.to_lowercase().as_str() {
            "png" => Some(ImageKind::Png),
            "jpg" | "jpeg" => Some(ImageKind::Jpeg),
            "gif" => Some(ImageKind::Gif),
            _ => None,
        }
    }

    /// Detect the kind from a MIME type.
    pub fn from_mime(mime: &str) -> Option<ImageKind> {
        ImageKind::ALL.into_iter().find(|k| k.mime() == mime)
    }
}
