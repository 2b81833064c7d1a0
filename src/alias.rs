//! Alias table, its JSON persistence, and one-level expansion.

use std::fmt;
use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use tracing::debug;

use crate::error::{Result, ShellError};
use crate::parse::ParsedCommand;

/// Alias name to raw expansion text, kept in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AliasTable {
    entries: Vec<(String, String)>,
}

impl AliasTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    /// Inserts or overwrites. An overwritten alias keeps its position.
    pub fn insert(&mut self, name: impl Into<String>, expansion: impl Into<String>) {
        let name = name.into();
        let expansion = expansion.into();
        match self.entries.iter_mut().find(|(n, _)| *n == name) {
            Some((_, v)) => *v = expansion,
            None => self.entries.push((name, expansion)),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

impl Serialize for AliasTable {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (name, expansion) in &self.entries {
            map.serialize_entry(name, expansion)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for AliasTable {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        struct TableVisitor;

        impl<'de> Visitor<'de> for TableVisitor {
            type Value = AliasTable;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("an object of alias name to expansion string")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> std::result::Result<AliasTable, A::Error> {
                let mut table = AliasTable::new();
                while let Some((name, expansion)) = access.next_entry::<String, String>()? {
                    table.insert(name, expansion);
                }
                Ok(table)
            }
        }

        deserializer.deserialize_map(TableVisitor)
    }
}

/// Load/save collaborator for the alias table.
pub trait AliasStore {
    fn load(&self) -> Result<AliasTable>;
    fn save(&self, table: &AliasTable) -> Result<()>;
}

/// Stores aliases as a pretty-printed JSON object.
pub struct JsonAliasStore {
    path: PathBuf,
}

impl JsonAliasStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl AliasStore for JsonAliasStore {
    fn load(&self) -> Result<AliasTable> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(AliasTable::new()),
            Err(e) => return Err(ShellError::path(&self.path, e)),
        };
        let table: AliasTable = serde_json::from_str(&content)?;
        debug!(path = %self.path.display(), count = table.len(), "loaded aliases");
        Ok(table)
    }

    fn save(&self, table: &AliasTable) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| ShellError::path(parent, e))?;
        }

        let mut buf = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
        let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
        table.serialize(&mut ser)?;

        fs::write(&self.path, buf).map_err(|e| ShellError::path(&self.path, e))?;
        debug!(path = %self.path.display(), count = table.len(), "saved aliases");
        Ok(())
    }
}

/// Substitutes at most one alias: the expansion's own arguments come
/// first, then the caller's. The expanded command is never looked up again.
pub fn expand(cmd: ParsedCommand, table: &AliasTable) -> Result<ParsedCommand> {
    let Some(expansion) = table.get(&cmd.command) else {
        return Ok(cmd);
    };

    let mut tokens = expansion.split_whitespace().map(str::to_string);
    let command = tokens
        .next()
        .ok_or_else(|| ShellError::EmptyAlias(cmd.command.clone()))?;

    let mut args: Vec<String> = tokens.collect();
    args.extend(cmd.args);
    Ok(ParsedCommand::new(command, args))
}


#[cfg(test)]
mod tests {
    use super::*;

    fn cmd(command: &str, args: &[&str]) -> ParsedCommand {
        ParsedCommand::new(command, args.iter().map(|s| s.to_string()).collect())
    }

    #[test]
    fn unknown_command_is_unchanged() {
        let table = AliasTable::new();
        assert_eq!(expand(cmd("ls", &["-l"]), &table).unwrap(), cmd("ls", &["-l"]));
    }

    #[test]
    fn expansion_args_precede_call_args() {
        let mut table = AliasTable::new();
        table.insert("g", "git log");
        let out = expand(cmd("g", &["--oneline"]), &table).unwrap();
        assert_eq!(out, cmd("git", &["log", "--oneline"]));
    }

    #[test]
    fn expansion_is_one_level_deep() {
        let mut table = AliasTable::new();
        table.insert("a", "b -x");
        table.insert("b", "c");
        let out = expand(cmd("a", &[]), &table).unwrap();
        assert_eq!(out, cmd("b", &["-x"]));
    }

    #[test]
    fn self_referencing_alias_does_not_loop() {
        let mut table = AliasTable::new();
        table.insert("ls", "ls -la");
        assert_eq!(expand(cmd("ls", &[]), &table).unwrap(), cmd("ls", &["-la"]));
    }

    #[test]
    fn blank_expansion_is_an_error() {
        let mut table = AliasTable::new();
        table.insert("x", "   ");
        let err = expand(cmd("x", &[]), &table).unwrap_err();
        assert!(matches!(err, ShellError::EmptyAlias(ref n) if n == "x"));
    }

    #[test]
    fn overwrite_keeps_position() {
        let mut table = AliasTable::new();
        table.insert("a", "1");
        table.insert("b", "2");
        table.insert("a", "3");
        let entries: Vec<_> = table.iter().collect();
        assert_eq!(entries, vec![("a", "3"), ("b", "2")]);
    }

    #[test]
    fn missing_file_loads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonAliasStore::new(dir.path().join("aliases.json"));
        assert_eq!(store.load().unwrap().len(), 0);
    }

    #[test]
    fn json_store_round_trip_preserves_order() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("aliases.json");
        let store = JsonAliasStore::new(&path);

        let mut table = AliasTable::new();
        table.insert("zz", "echo last");
        table.insert("aa", "echo first");
        store.save(&table).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert_eq!(content, "{\n    \"zz\": \"echo last\",\n    \"aa\": \"echo first\"\n}");
        assert_eq!(store.load().unwrap(), table);
    }

    #[test]
    fn non_string_values_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("aliases.json");
        fs::write(&path, r#"{"a": 1}"#).unwrap();
        let err = JsonAliasStore::new(&path).load().unwrap_err();
        assert!(matches!(err, ShellError::Json(_)));
    }
}
