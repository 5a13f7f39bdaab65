use {
    std::{
        fs::File,
        path::PathBuf,
    },
    log::{info, warn},
    structopt::StructOpt,
    satrail::{
        config::ScenarioConfig,
        scene::{Scene, track},
        r#type::{Coord, VectorFormat},
        Result,
    },
};

const LOG_TARGET: &'static str = "application";
pub const APP_NAME: &'static str = "satrail";

pub struct App {
    scene: Scene,
    output: Option<PathBuf>,
}

impl App {
    pub fn new(options: &Options) -> Result<Self> {
        let scenario = ScenarioConfig::load(&options.scenario)?;
        let scene = Scene::from_config(&scenario)?;

        Ok(Self {
            scene,
            output: options.output.clone(),
        })
    }

    pub fn run(&mut self, ticks: usize, tick: Coord) -> Result<()> {
        self.report_orbits();
        self.export_orbits()?;

        for _ in 0..ticks {
            self.scene.fixed_step(tick)?;
        }

        if ticks > 0 {
            self.report_locations(ticks, tick);
        }

        Ok(())
    }

    fn report_orbits(&self) {
        for satellite in self.scene.satellites() {
            match satellite.path() {
                Some(path) if path.budget_exceeded() => warn! {
                    target: LOG_TARGET,
                    "`{}`: orbit is not closed after {} steps ({} points)",
                    satellite.name(),
                    path.steps(),
                    path.len()
                },
                Some(path) => info! {
                    target: LOG_TARGET,
                    "`{}`: {} points, {:?}, closure gap {:.4}",
                    satellite.name(),
                    path.len(),
                    path.termination(),
                    path.closure_gap().unwrap_or(0.0)
                },
                None => warn! {
                    target: LOG_TARGET,
                    "`{}`: no orbit", satellite.name()
                },
            }
        }
    }

    fn export_orbits(&self) -> Result<()> {
        let dir = match &self.output {
            Some(dir) => dir,
            None => return Ok(()),
        };

        std::fs::create_dir_all(dir)?;

        for satellite in self.scene.satellites() {
            if let Some(path) = satellite.path() {
                let file_path = dir.join(format!("{}.csv", satellite.name()));
                track::write_csv(path, File::create(&file_path)?)?;

                info! {
                    target: LOG_TARGET,
                    "`{}`: orbit written to {}", satellite.name(), file_path.display()
                };
            }
        }

        Ok(())
    }

    fn report_locations(&self, ticks: usize, tick: Coord) {
        info! {
            target: LOG_TARGET,
            "after {} ticks of {}:", ticks, tick
        };

        for body in self.scene.bodies() {
            info! {
                target: LOG_TARGET,
                "body `{}` at {}", body.name(), VectorFormat::Short(body.location())
            };
        }

        for satellite in self.scene.satellites() {
            info! {
                target: LOG_TARGET,
                "satellite `{}` at {}", satellite.name(), VectorFormat::Short(satellite.location())
            };
        }
    }
}

#[derive(StructOpt, Debug)]
#[structopt(name = "satrail")]
pub struct Options {
    /// Scenario file (YAML)
    #[structopt(parse(from_os_str))]
    pub scenario: PathBuf,

    /// Directory for the computed orbits, one `<satellite>.csv` each
    #[structopt(short, long, parse(from_os_str))]
    pub output: Option<PathBuf>,

    /// Fixed ticks to run after the orbits are computed
    #[structopt(short, long, default_value = "0")]
    pub ticks: usize,

    /// Length of one fixed tick
    #[structopt(long, default_value = "0.02")]
    pub tick: Coord,

    /// Log level filter
    #[structopt(short, long, default_value = "warn")]
    pub log_filter: log::LevelFilter,

    /// Log targets to mute
    #[structopt(long)]
    pub mute: Vec<String>,
}
