//! Resume content as edited by the user and injected into the template.
//!
//! Every struct defaults each field, so partially-filled documents saved by the
//! editor still load. Serialization always writes every field back out.

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Basics {
    pub name: String,
    pub email: String,
    pub website: String,
    /// GitHub username, rendered as a profile link.
    pub github: String,
    pub phone: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Education {
    pub school: String,
    pub degree: String,
    pub time: String,
    pub details: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkExperience {
    pub company: String,
    pub team: String,
    pub role: String,
    pub time: String,
    pub details: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Project {
    pub name: String,
    pub description: String,
    pub details: Vec<String>,
    pub link: String,
    pub tech_stack: String,
}

/// A category/value pair, e.g. `Languages` → `Rust, Go`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Skill {
    pub key: String,
    pub value: String,
}

/// The full resume document. `ResumeData::default()` is the empty resume.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResumeData {
    pub basics: Basics,
    pub education: Vec<Education>,
    pub work: Vec<WorkExperience>,
    pub projects: Vec<Project>,
    pub other_projects: Vec<String>,
    pub open_source: Vec<String>,
    pub skills: Vec<Skill>,
    pub misc: Vec<String>,
    pub awards: Vec<String>,
}

impl ResumeData {
    pub fn from_json_str(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn to_json_string_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Reads a resume previously written by [`ResumeData::save`] or exported by the editor.
    pub async fn load(path: &Path) -> Result<Self> {
        let raw = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read resume data from '{}'", path.display()))?;
        Self::from_json_str(&raw)
            .with_context(|| format!("'{}' is not valid resume JSON", path.display()))
    }

    pub async fn save(&self, path: &Path) -> Result<()> {
        let json = self.to_json_string_pretty()?;
        tokio::fs::write(path, json)
            .await
            .with_context(|| format!("Failed to write resume data to '{}'", path.display()))
    }

    /// Number of populated list entries across all sections.
    pub fn entry_count(&self) -> usize {
        self.education.len()
            + self.work.len()
            + self.projects.len()
            + self.other_projects.len()
            + self.open_source.len()
            + self.skills.len()
            + self.misc.len()
            + self.awards.len()
    }
}
