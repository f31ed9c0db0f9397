/*!
Helpers pour construire des fichiers d'inventaire de test

- `InventoryBuilder` : construction fluide du texte `[groupe]` / hôtes
- `InventoryFile` : inventaire écrit dans un répertoire temporaire,
  supprimé quand la valeur est droppée
*/

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tempfile::TempDir;

#[derive(Debug, Clone)]
enum Line {
    Group(String),
    Host { name: String, vars: Vec<String> },
    Comment(String),
    Blank,
}

/// Construction d'inventaires au format groupé
#[derive(Debug, Clone, Default)]
pub struct InventoryBuilder {
    lines: Vec<Line>,
}

impl InventoryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inventaire classique dns / web / db
    pub fn three_tier(dns: usize, web: usize, db: usize) -> Self {
        let mut builder = Self::new();
        for (group, count) in [("dns", dns), ("web", web), ("db", db)] {
            builder = builder.group(group);
            for i in 1..=count {
                builder = builder.host(format!("{group}{i}"));
            }
        }
        builder
    }

    /// Ouvre un groupe `[name]`
    pub fn group<S: Into<String>>(mut self, name: S) -> Self {
        self.lines.push(Line::Group(name.into()));
        self
    }

    pub fn host<S: Into<String>>(mut self, name: S) -> Self {
        self.lines.push(Line::Host { name: name.into(), vars: Vec::new() });
        self
    }

    /// Hôte suivi de variables (`ansible_user=...`), ignorées au parsing
    pub fn host_with_vars<S: Into<String>>(mut self, name: S, vars: &[&str]) -> Self {
        self.lines.push(Line::Host {
            name: name.into(),
            vars: vars.iter().map(|v| v.to_string()).collect(),
        });
        self
    }

    pub fn comment<S: Into<String>>(mut self, text: S) -> Self {
        self.lines.push(Line::Comment(text.into()));
        self
    }

    pub fn blank(mut self) -> Self {
        self.lines.push(Line::Blank);
        self
    }

    /// Texte final de l'inventaire
    pub fn render(&self) -> String {
        let mut out = String::new();
        for line in &self.lines {
            let rendered = match line {
                Line::Group(name) => format!("[{name}]"),
                Line::Host { name, vars } if vars.is_empty() => name.clone(),
                Line::Host { name, vars } => format!("{name} {}", vars.join(" ")),
                Line::Comment(text) => format!("# {text}"),
                Line::Blank => String::new(),
            };
            out.push_str(&rendered);
            out.push('\n');
        }
        out
    }

    /// Écrit l'inventaire dans un répertoire temporaire
    pub fn write_temp(&self) -> Result<InventoryFile> {
        InventoryFile::with_contents(&self.render())
    }
}

/// Fichier d'inventaire temporaire (le répertoire vit tant que la valeur vit)
pub struct InventoryFile {
    dir: TempDir,
    path: PathBuf,
}

impl InventoryFile {
    pub fn with_contents(contents: &str) -> Result<Self> {
        let dir = tempfile::tempdir().context("Failed to create temp dir")?;
        let path = dir.path().join("hosts");
        std::fs::write(&path, contents)
            .with_context(|| format!("Failed to write inventory {}", path.display()))?;
        log::info!("📄 Wrote test inventory: {}", path.display());
        Ok(Self { dir, path })
    }

    /// Chemin vers un inventaire qui n'existe pas (dans un répertoire valide)
    pub fn missing() -> Result<Self> {
        let dir = tempfile::tempdir().context("Failed to create temp dir")?;
        let path = dir.path().join("absent-hosts");
        Ok(Self { dir, path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Remplace le contenu (pour tester la relecture à chaque requête)
    pub fn rewrite(&self, contents: &str) -> Result<()> {
        std::fs::write(&self.path, contents)
            .with_context(|| format!("Failed to rewrite inventory {}", self.path.display()))
    }

    pub fn dir(&self) -> &Path {
        self.dir.path()
    }
}
