//! Reading compiled contracts out of a Hardhat `artifacts/` tree.
//!
//! Hardhat writes one `<ContractName>.json` per contract under
//! `artifacts/<sourceName>/`, next to a `<ContractName>.dbg.json` that points
//! at the build info of the compiler run that produced it.

use std::{
    collections::BTreeMap,
    fs, io,
    path::{Path, PathBuf},
};

use ethers::{abi::Abi, types::Bytes};
use serde::{de::DeserializeOwned, Deserialize};
use thiserror::Error;

pub const DEFAULT_ARTIFACTS_DIR: &str = "artifacts";

const BUILD_INFO_DIR: &str = "build-info";
const DBG_SUFFIX: &str = ".dbg.json";

#[derive(Debug, Error)]
pub enum ArtifactError {
    #[error("artifact for contract `{0}` not found, are the contracts compiled?")]
    NotFound(String),
    #[error("multiple artifacts for contract `{name}`, use a fully qualified name: {candidates}")]
    Ambiguous { name: String, candidates: String },
    #[error("failed to read {}: {source}", path.display())]
    Io { path: PathBuf, source: io::Error },
    #[error("failed to parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("artifacts were compiled with solc {found}, but the config pins {expected}")]
    CompilerMismatch { expected: String, found: String },
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HardhatArtifact {
    #[serde(rename = "_format")]
    pub format: String,
    pub contract_name: String,
    pub source_name: String,
    pub abi: Abi,
    pub bytecode: Bytes,
    #[serde(default)]
    pub link_references: BTreeMap<String, serde_json::Value>,
    /// where the artifact was read from
    #[serde(skip)]
    pub path: PathBuf,
}

impl HardhatArtifact {
    pub fn fully_qualified_name(&self) -> String {
        format!("{}:{}", self.source_name, self.contract_name)
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct DebugFile {
    build_info: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct BuildInfo {
    solc_version: String,
}

pub struct ArtifactStore {
    root: PathBuf,
}

impl ArtifactStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// `name` is either a bare contract name, which has to be unique across
    /// all sources, or a fully qualified `path/to/Source.sol:Name`.
    pub fn read_artifact(&self, name: &str) -> Result<HardhatArtifact, ArtifactError> {
        let path = match name.rsplit_once(':') {
            Some((source_name, contract_name)) => {
                let path = self
                    .root
                    .join(source_name)
                    .join(format!("{contract_name}.json"));
                if !path.is_file() {
                    return Err(ArtifactError::NotFound(name.to_owned()));
                }
                path
            }
            None => self.find_unique(name)?,
        };

        let mut artifact: HardhatArtifact = read_json(&path)?;
        artifact.path = path;
        Ok(artifact)
    }

    /// solc version recorded in the build info of `artifact`, if hardhat left
    /// the debug file and build info around
    pub fn solc_version(&self, artifact: &HardhatArtifact) -> Result<Option<String>, ArtifactError> {
        let dbg_path = artifact
            .path
            .with_file_name(format!("{}{DBG_SUFFIX}", artifact.contract_name));
        if !dbg_path.is_file() {
            return Ok(None);
        }
        let dbg: DebugFile = read_json(&dbg_path)?;

        let build_info_path = dbg_path
            .parent()
            .unwrap_or(self.root.as_path())
            .join(dbg.build_info);
        if !build_info_path.is_file() {
            return Ok(None);
        }
        let build_info: BuildInfo = read_json(&build_info_path)?;

        Ok(Some(build_info.solc_version))
    }

    fn find_unique(&self, name: &str) -> Result<PathBuf, ArtifactError> {
        let file_name = format!("{name}.json");
        let mut matches = Vec::new();
        collect_artifacts(&self.root, &file_name, &mut matches)?;

        match matches.len() {
            0 => Err(ArtifactError::NotFound(name.to_owned())),
            1 => Ok(matches.remove(0)),
            _ => {
                matches.sort();
                let candidates = matches
                    .iter()
                    .map(|path| self.qualified_name_of(path, name))
                    .collect::<Vec<_>>()
                    .join(", ");
                Err(ArtifactError::Ambiguous {
                    name: name.to_owned(),
                    candidates,
                })
            }
        }
    }

    fn qualified_name_of(&self, path: &Path, name: &str) -> String {
        let source = path
            .parent()
            .and_then(|dir| dir.strip_prefix(&self.root).ok())
            .unwrap_or(Path::new(""));
        format!("{}:{name}", source.display())
    }
}

fn collect_artifacts(
    dir: &Path,
    file_name: &str,
    matches: &mut Vec<PathBuf>,
) -> Result<(), ArtifactError> {
    let io_err = |source| ArtifactError::Io {
        path: dir.to_path_buf(),
        source,
    };

    if !dir.is_dir() {
        return Ok(());
    }

    for entry in fs::read_dir(dir).map_err(io_err)? {
        let path = entry.map_err(io_err)?.path();
        if path.is_dir() {
            if path.file_name().is_some_and(|n| n == BUILD_INFO_DIR) {
                continue;
            }
            collect_artifacts(&path, file_name, matches)?;
        } else if path.file_name().is_some_and(|n| n == file_name)
            && !path.to_string_lossy().ends_with(DBG_SUFFIX)
        {
            matches.push(path);
        }
    }
    Ok(())
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, ArtifactError> {
    let raw = fs::read_to_string(path).map_err(|source| ArtifactError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&raw).map_err(|source| ArtifactError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// An unknown version is let through, hardhat may have cleaned the build info.
pub fn ensure_compiler_version(expected: &str, found: Option<&str>) -> Result<(), ArtifactError> {
    match found {
        Some(found) if found != expected => Err(ArtifactError::CompilerMismatch {
            expected: expected.to_owned(),
            found: found.to_owned(),
        }),
        Some(_) => Ok(()),
        None => {
            tracing::warn!(%expected, "could not determine the solc version of the artifacts");
            Ok(())
        }
    }
}
