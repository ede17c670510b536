//! IR remote button mapping
//!
//! The LIRC daemon reports buttons by remote name and button name
//! ("mceusb", "KEY_OK"). `[ir.<remote>]` tables translate those to
//! remote button codes; `[ir."*"]` applies to any remote.

use std::collections::HashMap;

use log::warn;

use super::keymap::{string_entries, KeymapDocument};
use crate::input::keycodes;

const ANY_REMOTE: &str = "*";

/// Remote name + button name to remote button code
#[derive(Debug, Default)]
pub struct IrTranslator {
    remotes: HashMap<String, HashMap<String, u32>>,
}

impl IrTranslator {
    /// Rebuild from the `ir` tables of the given documents
    pub fn load<'a>(&mut self, docs: impl IntoIterator<Item = &'a KeymapDocument>) {
        self.clear();
        for doc in docs {
            let Some(ir) = doc.table("ir") else {
                continue;
            };
            for (remote, buttons) in ir {
                let Some(buttons) = buttons.as_table() else {
                    warn!("Keymap {}: ir.{} is not a table", doc.name(), remote);
                    continue;
                };
                let map = self.remotes.entry(remote.clone()).or_default();
                for (button, target) in string_entries(buttons, doc.name()) {
                    match keycodes::remote_button_from_name(target) {
                        Some(code) => {
                            map.insert(button.to_string(), code);
                        }
                        None => warn!(
                            "Keymap {}: ir.{}.{} maps to unknown remote button '{}'",
                            doc.name(),
                            remote,
                            button,
                            target
                        ),
                    }
                }
            }
        }
    }

    pub fn clear(&mut self) {
        self.remotes.clear();
    }

    /// Remote button code, or None if the button is not mapped
    pub fn translate(&self, remote: &str, button: &str) -> Option<u32> {
        self.remotes
            .get(remote)
            .and_then(|m| m.get(button))
            .or_else(|| self.remotes.get(ANY_REMOTE).and_then(|m| m.get(button)))
            .copied()
    }
}
