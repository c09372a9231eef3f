use crate::config::Config;
use crate::engine::Engine;
use crate::model::Trajectory;
use crate::params::SimulationParameters;
use crate::report::Dashboard;
use crate::stats::SummaryStatistics;
use anyhow::{Context, Result, bail};
use glob::glob;
use rmp_serde::{decode, encode};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use std::{
    fs::{self, File},
    io::{BufReader, BufWriter, Write},
    path::{Path, PathBuf},
};

/// Trajectory together with the parameters that produced it.
#[derive(Serialize, Deserialize)]
struct Run {
    params: SimulationParameters,
    traj: Trajectory,
}

#[derive(Serialize)]
struct Summary<'a> {
    r0_display: &'a str,
    explanation: &'a str,
    stats: &'a SummaryStatistics,
}

pub struct Manager {
    sim_dir: PathBuf,
}

impl Manager {
    pub fn new<P: AsRef<Path>>(sim_dir: P) -> Result<Self> {
        let sim_dir = sim_dir.as_ref().to_path_buf();
        if !sim_dir.is_dir() {
            bail!("{sim_dir:?} is not a directory");
        }
        Ok(Self { sim_dir })
    }

    pub fn create_config(&self) -> Result<()> {
        let config_file = self.config_file();
        if config_file.exists() {
            bail!("{config_file:?} already exists");
        }

        Config::default()
            .to_file(&config_file)
            .context("failed to write default config")?;
        log::info!("created {config_file:?}");

        Ok(())
    }

    pub fn run_simulation(&self) -> Result<()> {
        let cfg = self.load_config()?;

        let engine = Engine::new(cfg.params()).context("failed to construct engine")?;
        let traj = engine.simulate().context("failed to simulate")?;

        let run = Run {
            params: *engine.params(),
            traj,
        };

        let traj_file = self.trajectory_file();
        write_msgpack(&traj_file, &run).context("failed to save trajectory")?;
        log::info!("saved {} points to {traj_file:?}", run.traj.len());

        Ok(())
    }

    pub fn analyze_run(&self) -> Result<()> {
        let cfg = self.load_config()?;
        let params = cfg.params();

        let traj_file = self.trajectory_file();
        let run: Run =
            read_msgpack(&traj_file).with_context(|| format!("failed to load {traj_file:?}"))?;
        if run.params != params {
            bail!("trajectory was simulated with other parameters, run the simulation again");
        }

        let dashboard =
            Dashboard::from_trajectory(&params, &run.traj).context("failed to summarize run")?;

        let summary = Summary {
            r0_display: &dashboard.r0_display,
            explanation: &dashboard.explanation,
            stats: &dashboard.summary,
        };
        let summary_file = self.summary_file();
        let contents = toml::to_string(&summary).context("failed to serialize summary")?;
        fs::write(&summary_file, contents)
            .with_context(|| format!("failed to write {summary_file:?}"))?;
        log::info!("saved {summary_file:?}");

        let figure_file = self.figure_file();
        write_msgpack(&figure_file, &dashboard.figure).context("failed to save figure")?;
        log::info!("saved {figure_file:?}");

        let mut stdout = std::io::stdout().lock();
        writeln!(stdout, "{}", dashboard.r0_display)?;
        writeln!(stdout, "{}", dashboard.figure.title)?;
        writeln!(stdout, "{}", dashboard.explanation)?;

        Ok(())
    }

    pub fn clean_sim(&self) -> Result<()> {
        let pattern = self.sim_dir.join("*.msgpack");
        let pattern = pattern.to_str().context("pattern is not valid UTF-8")?;
        let mut files: Vec<_> = glob(pattern)
            .context("failed to glob output files")?
            .filter_map(Result::ok)
            .collect();
        files.push(self.summary_file());

        for file in files.into_iter().filter(|f| f.is_file()) {
            fs::remove_file(&file).with_context(|| format!("failed to remove {file:?}"))?;
            log::info!("removed {file:?}");
        }

        Ok(())
    }

    fn load_config(&self) -> Result<Config> {
        let cfg = Config::from_file(self.config_file()).context("failed to construct cfg")?;
        log::info!("{cfg:#?}");
        Ok(cfg)
    }

    fn config_file(&self) -> PathBuf {
        self.sim_dir.join("config.toml")
    }

    fn trajectory_file(&self) -> PathBuf {
        self.sim_dir.join("trajectory.msgpack")
    }

    fn figure_file(&self) -> PathBuf {
        self.sim_dir.join("figure.msgpack")
    }

    fn summary_file(&self) -> PathBuf {
        self.sim_dir.join("summary.toml")
    }
}

fn write_msgpack<T: Serialize, P: AsRef<Path>>(file: P, val: &T) -> Result<()> {
    let file = file.as_ref();
    let file = File::create(file).with_context(|| format!("failed to create {file:?}"))?;
    let mut writer = BufWriter::new(file);
    encode::write(&mut writer, val).context("failed to serialize value")?;
    writer.flush().context("failed to flush writer stream")?;
    Ok(())
}

fn read_msgpack<T: DeserializeOwned, P: AsRef<Path>>(file: P) -> Result<T> {
    let file = file.as_ref();
    let file = File::open(file).with_context(|| format!("failed to open {file:?}"))?;
    let mut reader = BufReader::new(file);
    let val = decode::from_read(&mut reader).context("failed to deserialize value")?;
    Ok(val)
}
