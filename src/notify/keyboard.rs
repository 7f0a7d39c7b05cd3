// src/notify/keyboard.rs
//! Viber custom keyboard payload.

use serde::{Deserialize, Serialize};

use crate::command::Category;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Keyboard {
    #[serde(rename = "Type")]
    pub kind: String,
    pub buttons: Vec<Button>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Button {
    /// Width on a 6-column grid.
    pub columns: u8,
    pub rows: u8,
    pub action_type: String,
    pub action_body: String,
    pub text: String,
}

/// Two buttons per row, one per category; tapping replies with the command token.
pub fn category_menu() -> Keyboard {
    Keyboard {
        kind: "keyboard".to_string(),
        buttons: Category::ALL
            .iter()
            .map(|cat| Button {
                columns: 3,
                rows: 1,
                action_type: "reply".to_string(),
                action_body: cat.command().to_string(),
                text: cat.label().to_string(),
            })
            .collect(),
    }
}
