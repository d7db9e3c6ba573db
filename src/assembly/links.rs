//! Navigation links registered by blocks
//!
//! Links are recorded as they are generated so later blocks can ask whether a destination is
//! already reachable instead of scanning rendered props.

use crate::record::Record;
use serde::{Deserialize, Serialize};

pub const HOME_HREF: &str = "/";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    pub block_type: String,
    pub label: String,
    pub href: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LinkRegistry {
    links: Vec<Link>,
}

impl LinkRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, block_type: &str, label: &str, href: &str) {
        self.links.push(Link {
            block_type: block_type.to_string(),
            label: label.to_string(),
            href: href.to_string(),
        });
    }

    pub fn has_link_to(&self, href: &str) -> bool {
        self.links.iter().any(|l| l.href == href)
    }

    pub fn links_for<'a>(&'a self, block_type: &'a str) -> impl Iterator<Item = &'a Link> + 'a {
        self.links.iter().filter(move |l| l.block_type == block_type)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Link> {
        self.links.iter()
    }

    pub fn len(&self) -> usize {
        self.links.len()
    }

    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }
}

/// Header menu entries (label, href) for a record
pub fn header_menu(record: &Record) -> Vec<(&'static str, &'static str)> {
    let mut items = vec![("Accueil", HOME_HREF)];
    if record.count("services") > 0 {
        items.push(("Services", "#services"));
    }
    if record.count("portfolioImages") > 0 {
        items.push(("Réalisations", "#gallery"));
    }
    if record.count("teamMembers") > 0 {
        items.push(("Équipe", "#team"));
    }
    items.push(("À propos", "#about"));
    items.push(("Contact", "#contact"));
    items
}
