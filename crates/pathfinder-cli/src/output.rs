//! Output formatting utilities

use pathfinder_core::{Path, RelaxationResult};
use pathfinder_store::StoreStats;
use serde::Serialize;

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Table,
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "table" => Ok(Self::Table),
            "json" => Ok(Self::Json),
            other => Err(format!("Unknown output format: {} (expected table or json)", other)),
        }
    }
}

/// Render any serializable value as pretty JSON
pub fn to_json<T: Serialize>(data: &T) -> anyhow::Result<String> {
    Ok(serde_json::to_string_pretty(data)?)
}

fn route(path: &Path) -> String {
    path.join(" -> ")
}

/// Paths from a strict query
pub fn format_paths(
    source: &str,
    destination: &str,
    paths: &[Path],
    format: OutputFormat,
) -> anyhow::Result<String> {
    if format == OutputFormat::Json {
        return to_json(&paths);
    }

    if paths.is_empty() {
        return Ok(format!("No path found from '{}' to '{}'", source, destination));
    }

    let mut out = format!(
        "{} shortest path(s) from '{}' to '{}':",
        paths.len(),
        source,
        destination
    );
    for (i, path) in paths.iter().enumerate() {
        out.push_str(&format!("\n  Path {}: {} hops", i + 1, path.len().saturating_sub(1)));
        out.push_str(&format!("\n    {}", route(path)));
    }
    Ok(out)
}

/// Records from a flexible query
pub fn format_flexible(
    source: &str,
    destination: &str,
    results: &[RelaxationResult],
    format: OutputFormat,
) -> anyhow::Result<String> {
    if format == OutputFormat::Json {
        return to_json(&results);
    }

    let mut out = format!("Flexible search from '{}' to '{}':", source, destination);
    for result in results {
        let dropped = if result.dropped.is_empty() {
            "none".to_string()
        } else {
            result.dropped.join(", ")
        };
        out.push_str(&format!("\n\n  Honored: {}", result.honored));
        out.push_str(&format!("\n  Dropped: {}", dropped));
        if result.paths.is_empty() {
            out.push_str("\n    (no path)");
        }
        for path in &result.paths {
            out.push_str(&format!("\n    {}", route(path)));
        }
    }
    Ok(out)
}

/// Snapshot statistics
pub fn format_stats(stats: &StoreStats, format: OutputFormat) -> anyhow::Result<String> {
    if format == OutputFormat::Json {
        return to_json(stats);
    }

    let t = &stats.topology;
    let mut out = String::from("Topology:");
    out.push_str(&format!("\n  switches:     {}", t.switches));
    out.push_str(&format!("\n  interfaces:   {}", t.interfaces));
    out.push_str(&format!("\n  links:        {}", t.links));
    if t.placeholders > 0 {
        out.push_str(&format!("\n  placeholders: {}", t.placeholders));
    }
    out.push_str(&format!("\n  generation:   {}", stats.generation));
    out.push_str(&format!("\n  updated:      {}", stats.updated_at.to_rfc3339()));
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn path(ids: &[&str]) -> Path {
        ids.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_parse_format() {
        assert_eq!("JSON".parse::<OutputFormat>().unwrap(), OutputFormat::Json);
        assert_eq!("table".parse::<OutputFormat>().unwrap(), OutputFormat::Table);
        assert!("csv".parse::<OutputFormat>().is_err());
    }

    #[test]
    fn test_table_paths() {
        let paths = vec![path(&["S1", "S1:1", "S2:1", "S2"])];
        let out = format_paths("S1", "S2", &paths, OutputFormat::Table).unwrap();
        assert!(out.contains("Path 1: 3 hops"));
        assert!(out.contains("S1 -> S1:1 -> S2:1 -> S2"));

        let out = format_paths("S1", "S4", &[], OutputFormat::Table).unwrap();
        assert_eq!(out, "No path found from 'S1' to 'S4'");
    }

    #[test]
    fn test_json_paths() {
        let paths = vec![path(&["S1"])];
        let out = format_paths("S1", "S1", &paths, OutputFormat::Json).unwrap();
        let parsed: Vec<Vec<String>> = serde_json::from_str(&out).unwrap();
        assert_eq!(parsed, paths);
    }
}
