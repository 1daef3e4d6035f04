//! `dragboard config`: print the effective config and where it came from.

use std::io::{self, Write};

use anyhow::Result;
use dragboard_core::config::{ConfigSource, ResolvedConfig};
use dragboard_core::model::ListId;

use crate::output::{OutputMode, pretty_kv, pretty_section, render_mode};

/// Execute `dragboard config`.
pub fn run_config(resolved: &ResolvedConfig, output: OutputMode) -> Result<()> {
    render_mode(output, resolved, write_text, write_pretty)
}

fn source_label(source: &ConfigSource) -> String {
    match source {
        ConfigSource::Env(path) => format!("env {}", path.display()),
        ConfigSource::Project(path) => format!("project {}", path.display()),
        ConfigSource::User(path) => format!("user {}", path.display()),
        ConfigSource::Default => "built-in defaults".to_string(),
    }
}

fn banned_pairs(pairs: &[(ListId, ListId)]) -> String {
    if pairs.is_empty() {
        return "none".to_string();
    }
    pairs
        .iter()
        .map(|(from, to)| format!("{from}->{to}"))
        .collect::<Vec<_>>()
        .join(",")
}

fn write_text(resolved: &ResolvedConfig, w: &mut dyn Write) -> io::Result<()> {
    let config = &resolved.config;
    writeln!(w, "source={}", source_label(&resolved.source))?;
    writeln!(w, "policy.banned_pairs={}", banned_pairs(&config.policy.banned_pairs))?;
    writeln!(w, "policy.parity_clash={}", config.policy.parity_clash)?;
    writeln!(w, "group.validation={}", group_label(resolved))?;
    writeln!(w, "seed.items_per_list={}", config.seed.items_per_list)
}

fn write_pretty(resolved: &ResolvedConfig, w: &mut dyn Write) -> io::Result<()> {
    let config = &resolved.config;
    pretty_section(w, "Config")?;
    pretty_kv(w, "Source", source_label(&resolved.source))?;
    pretty_kv(w, "Banned pairs", banned_pairs(&config.policy.banned_pairs))?;
    pretty_kv(w, "Parity clash", config.policy.parity_clash.to_string())?;
    pretty_kv(w, "Group check", group_label(resolved))?;
    pretty_kv(w, "Items/list", config.seed.items_per_list.to_string())
}

fn group_label(resolved: &ResolvedConfig) -> String {
    serde_json::to_value(resolved.config.group.validation)
        .ok()
        .and_then(|v| v.as_str().map(str::to_string))
        .unwrap_or_default()
}
