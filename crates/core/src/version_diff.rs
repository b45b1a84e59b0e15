//! Structural comparison of two page snapshots.
//!
//! Produces human-readable change lines in three groups: layout fields,
//! blocks (matched by `block_key`), and translations of blocks present on
//! both sides (matched by locale).

use serde::Serialize;

use crate::snapshot::{ContentBlockWithTranslations, PageLayoutData, PageSnapshot};

/// How an item differs between the older and the newer snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeKind {
    Added,
    Removed,
    Modified,
}

impl ChangeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Added => "added",
            Self::Removed => "removed",
            Self::Modified => "modified",
        }
    }
}

impl std::fmt::Display for ChangeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Differences between two snapshots of the same page.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct VersionComparison {
    pub layout_changes: Vec<String>,
    pub block_changes: Vec<String>,
    pub translation_changes: Vec<String>,
}

impl VersionComparison {
    pub fn has_changes(&self) -> bool {
        !(self.layout_changes.is_empty()
            && self.block_changes.is_empty()
            && self.translation_changes.is_empty())
    }
}

/// Compare `from` (the base) against `to`.
pub fn compare_snapshots(from: &PageSnapshot, to: &PageSnapshot) -> VersionComparison {
    VersionComparison {
        layout_changes: layout_changes(&from.layout, &to.layout),
        block_changes: block_changes(from, to),
        translation_changes: translation_changes(from, to),
    }
}

fn show_opt(value: &Option<String>) -> String {
    match value {
        Some(v) => format!("\"{v}\""),
        None => "(none)".to_string(),
    }
}

fn layout_changes(from: &PageLayoutData, to: &PageLayoutData) -> Vec<String> {
    let mut changes = Vec::new();
    if from.name != to.name {
        changes.push(format!("Name changed from \"{}\" to \"{}\"", from.name, to.name));
    }
    if from.page_type != to.page_type {
        changes.push(format!(
            "Page type changed from {} to {}",
            from.page_type, to.page_type
        ));
    }
    if from.route != to.route {
        changes.push(format!("Route changed from {} to {}", from.route, to.route));
    }
    if from.title != to.title {
        changes.push(format!(
            "Title changed from {} to {}",
            show_opt(&from.title),
            show_opt(&to.title)
        ));
    }
    if from.description != to.description {
        changes.push(format!(
            "Description changed from {} to {}",
            show_opt(&from.description),
            show_opt(&to.description)
        ));
    }
    if from.is_active != to.is_active {
        changes.push(format!(
            "Active status changed from {} to {}",
            from.is_active, to.is_active
        ));
    }
    if from.is_published != to.is_published {
        changes.push(format!(
            "Published status changed from {} to {}",
            from.is_published, to.is_published
        ));
    }
    changes
}

/// Configuration strings are equal when they decode to the same JSON value;
/// undecodable text falls back to byte comparison.
fn same_configuration(a: &str, b: &str) -> bool {
    match (
        serde_json::from_str::<serde_json::Value>(a),
        serde_json::from_str::<serde_json::Value>(b),
    ) {
        (Ok(x), Ok(y)) => x == y,
        _ => a == b,
    }
}

fn sorted_blocks(snapshot: &PageSnapshot) -> Vec<&ContentBlockWithTranslations> {
    let mut blocks: Vec<&ContentBlockWithTranslations> = snapshot.blocks.iter().collect();
    blocks.sort_by(|a, b| {
        a.display_order
            .cmp(&b.display_order)
            .then_with(|| a.block_key.cmp(&b.block_key))
    });
    blocks
}

fn block_changes(from: &PageSnapshot, to: &PageSnapshot) -> Vec<String> {
    let mut changes = Vec::new();

    for new in sorted_blocks(to) {
        let Some(old) = from.block(&new.block_key) else {
            changes.push(format!(
                "{} block \"{}\" ({})",
                capitalize(ChangeKind::Added),
                new.block_key,
                new.block_type
            ));
            continue;
        };

        let mut details = Vec::new();
        if old.block_type != new.block_type {
            details.push(format!(
                "type changed from {} to {}",
                old.block_type, new.block_type
            ));
        }
        if old.display_order != new.display_order {
            details.push(format!(
                "display order changed from {} to {}",
                old.display_order, new.display_order
            ));
        }
        if old.is_visible != new.is_visible {
            details.push(format!(
                "visibility changed from {} to {}",
                visibility(old.is_visible),
                visibility(new.is_visible)
            ));
        }
        if !same_configuration(&old.configuration, &new.configuration) {
            details.push("configuration changed".to_string());
        }
        if !details.is_empty() {
            changes.push(format!(
                "{} block \"{}\": {}",
                capitalize(ChangeKind::Modified),
                new.block_key,
                details.join(", ")
            ));
        }
    }

    for old in sorted_blocks(from) {
        if to.block(&old.block_key).is_none() {
            changes.push(format!(
                "{} block \"{}\" ({})",
                capitalize(ChangeKind::Removed),
                old.block_key,
                old.block_type
            ));
        }
    }

    changes
}

fn translation_changes(from: &PageSnapshot, to: &PageSnapshot) -> Vec<String> {
    let mut changes = Vec::new();

    for new in sorted_blocks(to) {
        let Some(old) = from.block(&new.block_key) else {
            continue;
        };

        let mut entries: Vec<(ChangeKind, &str)> = Vec::new();
        for t in &new.translations {
            match old.translation(&t.locale) {
                None => entries.push((ChangeKind::Added, t.locale.as_str())),
                Some(prev) if prev.content != t.content => {
                    entries.push((ChangeKind::Modified, t.locale.as_str()))
                }
                Some(_) => {}
            }
        }
        for t in &old.translations {
            if new.translation(&t.locale).is_none() {
                entries.push((ChangeKind::Removed, t.locale.as_str()));
            }
        }
        entries.sort_by(|a, b| a.1.cmp(b.1));

        for (kind, locale) in entries {
            changes.push(format!(
                "Block \"{}\": {kind} \"{locale}\" translation",
                new.block_key
            ));
        }
    }

    changes
}

fn visibility(is_visible: bool) -> &'static str {
    if is_visible {
        "visible"
    } else {
        "hidden"
    }
}

fn capitalize(kind: ChangeKind) -> &'static str {
    match kind {
        ChangeKind::Added => "Added",
        ChangeKind::Removed => "Removed",
        ChangeKind::Modified => "Modified",
    }
}
