//! Local OSRM dataset preparation (Geofabrik extract + osrm-backend tools).
//!
//! Used to stand up a self-hosted routing provider instead of the public
//! demo server. Each stage is skipped when its output files already exist.

use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::process::Command;

use tracing::info;

const OSRM_IMAGE: &str = "osrm/osrm-backend";

#[derive(Debug, thiserror::Error)]
pub enum DatasetError {
    #[error("dataset io error: {0}")]
    Io(#[from] io::Error),

    #[error("extract download failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{stage} failed: {status}")]
    ProcessFailure { stage: &'static str, status: String },
}

/// A Geofabrik extract, e.g. `asia/myanmar`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeofabrikRegion {
    pub path: String,
}

impl GeofabrikRegion {
    pub fn new(path: impl Into<String>) -> Self {
        Self { path: path.into() }
    }

    pub fn myanmar() -> Self {
        Self::new("asia/myanmar")
    }

    pub fn name(&self) -> &str {
        self.path.rsplit('/').next().unwrap_or("region")
    }

    pub fn url(&self) -> String {
        format!("https://download.geofabrik.de/{}-latest.osm.pbf", self.path)
    }
}

/// Travel profile shipped inside the osrm-backend image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OsrmProfile {
    Car,
    Bicycle,
    Foot,
}

impl OsrmProfile {
    fn lua_path(self) -> &'static str {
        match self {
            OsrmProfile::Car => "/opt/car.lua",
            OsrmProfile::Bicycle => "/opt/bicycle.lua",
            OsrmProfile::Foot => "/opt/foot.lua",
        }
    }
}

#[derive(Debug, Clone)]
pub struct OsrmDatasetConfig {
    pub region: GeofabrikRegion,
    pub data_root: PathBuf,
    pub profile: OsrmProfile,
}

impl OsrmDatasetConfig {
    pub fn new(region: GeofabrikRegion, data_root: impl Into<PathBuf>) -> Self {
        Self {
            region,
            data_root: data_root.into(),
            profile: OsrmProfile::Car,
        }
    }
}

/// Files of a prepared multi-level-Dijkstra dataset.
#[derive(Debug, Clone)]
pub struct OsrmDataset {
    pub data_dir: PathBuf,
    pub osrm_base: PathBuf,
    pub pbf_path: PathBuf,
}

impl OsrmDataset {
    /// Downloads and preprocesses the region unless already prepared.
    pub fn ensure(config: &OsrmDatasetConfig) -> Result<Self, DatasetError> {
        let data_root = if config.data_root.is_absolute() {
            config.data_root.clone()
        } else {
            std::env::current_dir()?.join(&config.data_root)
        };
        let name = config.region.name();
        let data_dir = data_root.join(name);
        fs::create_dir_all(&data_dir)?;

        let dataset = Self {
            pbf_path: data_dir.join(format!("{name}-latest.osm.pbf")),
            osrm_base: data_dir.join(format!("{name}-latest.osrm")),
            data_dir,
        };

        if !dataset.pbf_path.exists() {
            info!(url = %config.region.url(), "downloading extract");
            download(&config.region.url(), &dataset.pbf_path)?;
        }

        if !dataset.osrm_base.exists() {
            let pbf = container_path(&dataset.pbf_path);
            dataset.run_tool("osrm-extract", &["-p", config.profile.lua_path(), &pbf])?;
        }

        if !dataset.is_ready() {
            let base = container_path(&dataset.osrm_base);
            dataset.run_tool("osrm-partition", &[&base])?;
            dataset.run_tool("osrm-customize", &[&base])?;
        }

        Ok(dataset)
    }

    /// Whether every file `osrm-routed --algorithm mld` needs is present.
    pub fn is_ready(&self) -> bool {
        ["osrm.partition", "osrm.mldgr", "osrm.cells"]
            .iter()
            .all(|ext| self.osrm_base.with_extension(ext).exists())
            && self.osrm_base.exists()
    }

    /// Path of the `.osrm` base as seen from inside the container.
    pub fn container_base(&self) -> String {
        container_path(&self.osrm_base)
    }

    fn run_tool(&self, stage: &'static str, args: &[&str]) -> Result<(), DatasetError> {
        info!(stage, dir = %self.data_dir.display(), "running osrm tool");
        let status = Command::new("docker")
            .args(["run", "--rm", "-t", "-v"])
            .arg(format!("{}:/data", self.data_dir.display()))
            .arg(OSRM_IMAGE)
            .arg(stage)
            .args(args)
            .status()?;

        if status.success() {
            Ok(())
        } else {
            Err(DatasetError::ProcessFailure {
                stage,
                status: status.to_string(),
            })
        }
    }
}

fn download(url: &str, dest: &Path) -> Result<(), DatasetError> {
    let mut response = reqwest::blocking::get(url)?.error_for_status()?;
    let tmp_path = dest.with_extension("part");
    let mut writer = BufWriter::new(File::create(&tmp_path)?);
    response.copy_to(&mut writer)?;
    writer.flush()?;
    fs::rename(tmp_path, dest)?;
    Ok(())
}

fn container_path(path: &Path) -> String {
    let file = path
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or_default();
    format!("/data/{file}")
}
