// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Command templating and the build spec submitted with every build.

use crate::naming::OutputNames;
use crate::template::interpolate;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};

/// Token replaced by the unit's file list.
pub const FILES_PLACEHOLDER: &str = "FILES";

/// Replace every `FILES` token with `targets`, flattened in place.
pub fn interpolate_files(commands: &[String], targets: &[String]) -> Vec<String> {
    commands
        .iter()
        .flat_map(|token| {
            if token == FILES_PLACEHOLDER {
                targets.to_vec()
            } else {
                vec![token.clone()]
            }
        })
        .collect()
}

/// Shell line run by a build: the command with output redirected into the
/// three result objects.
pub fn redirected_command(tokens: &[String], outputs: &OutputNames) -> String {
    format!(
        "{} 1> {} 2> {}; echo $? > {}",
        tokens.join(" "),
        outputs.stdout,
        outputs.stderr,
        outputs.exit_status
    )
}

#[derive(Serialize)]
struct SpecDoc<'a> {
    version: f32,
    phases: BTreeMap<&'a str, PhaseDoc>,
    artifacts: ArtifactsDoc<'a>,
}

#[derive(Serialize)]
struct PhaseDoc {
    commands: Vec<String>,
}

#[derive(Serialize)]
struct ArtifactsDoc<'a> {
    files: [&'a str; 3],
}

/// How the build spec for a unit is produced.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum BuildSpecTemplate {
    /// Built-in single-phase spec.
    #[default]
    Default,
    /// User template with `${commands}`, `${stdout}`, `${stderr}` and
    /// `${exit_status}` placeholders.
    Custom(String),
}

impl BuildSpecTemplate {
    /// Render the spec for one unit.
    pub fn render(
        &self,
        commands: &[String],
        targets: &[String],
        outputs: &OutputNames,
    ) -> Result<String, serde_yaml::Error> {
        let tokens = interpolate_files(commands, targets);
        match self {
            BuildSpecTemplate::Default => {
                let doc = SpecDoc {
                    version: 0.2,
                    phases: BTreeMap::from([(
                        "build",
                        PhaseDoc {
                            commands: vec![redirected_command(&tokens, outputs)],
                        },
                    )]),
                    artifacts: ArtifactsDoc {
                        files: [&outputs.stdout, &outputs.stderr, &outputs.exit_status],
                    },
                };
                serde_yaml::to_string(&doc)
            }
            BuildSpecTemplate::Custom(template) => {
                let vars = HashMap::from([
                    ("commands", tokens.join(" ")),
                    ("stdout", outputs.stdout.clone()),
                    ("stderr", outputs.stderr.clone()),
                    ("exit_status", outputs.exit_status.clone()),
                ]);
                Ok(interpolate(template, &vars))
            }
        }
    }
}

#[cfg(test)]
#[path = "command_tests.rs"]
mod tests;
