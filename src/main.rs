use celtic_orbit::render;
use celtic_orbit::{Bounds, Complex64, Error, Formula, Mode, Pos, Scene, Viewport};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use std::time::Instant;
use structopt::StructOpt;

/// Parse a complex literal written as `RE,IM`.
fn parse_complex(s: &str) -> Result<Complex64, Error> {
    let mut parts = s.splitn(2, ',');
    let re = parts.next().map(str::trim).and_then(|p| p.parse::<f64>().ok());
    let im = parts.next().map(str::trim).and_then(|p| p.parse::<f64>().ok());

    match (re, im) {
        (Some(re), Some(im)) => Ok(Complex64::new(re, im)),
        _ => Err(Error::Parse(s.to_string())),
    }
}

/// Scene overrides shared by every subcommand that evaluates something.
#[derive(Debug, StructOpt)]
struct SceneOptions {
    /// Scene file to start from; defaults are used when absent
    #[structopt(long = "scene")]
    scene: Option<PathBuf>,

    #[structopt(long = "width")]
    width: Option<u32>,

    #[structopt(long = "height")]
    height: Option<u32>,

    /// Formula index (1-4) or name
    #[structopt(long = "formula")]
    formula: Option<Formula>,

    /// Julia constant as RE,IM; switches to Julia mode
    #[structopt(long = "julia", allow_hyphen_values = true, parse(try_from_str = parse_complex))]
    julia: Option<Complex64>,

    #[structopt(long = "max-iter")]
    max_iter: Option<u32>,

    #[structopt(long = "max-orbit-steps")]
    max_orbit_steps: Option<usize>,
}

impl SceneOptions {
    const DEFAULT_BOUNDS: Bounds = Bounds {
        width: 800,
        height: 600,
    };

    fn build(&self) -> Result<Scene, Error> {
        let mut scene = match self.scene {
            Some(ref path) => Scene::load(path)?,
            None => Scene::for_bounds(Self::DEFAULT_BOUNDS),
        };

        if self.width.is_some() || self.height.is_some() {
            let old = scene.viewport.bounds();
            let bounds = Bounds {
                width: self.width.unwrap_or(old.width),
                height: self.height.unwrap_or(old.height),
            };
            scene.viewport = Viewport::new(scene.viewport.zoom(), scene.viewport.offset(), bounds)?;
        }
        if let Some(formula) = self.formula {
            scene.formula = formula;
        }
        if let Some(c) = self.julia {
            scene.mode = Mode::Julia(c);
        }
        if let Some(max_iter) = self.max_iter {
            scene.limits.max_iter = max_iter;
        }
        if let Some(steps) = self.max_orbit_steps {
            scene.limits.max_orbit_steps = steps;
        }

        scene.validate()?;
        log::debug!("scene: {:?}", scene);
        Ok(scene)
    }
}

#[derive(Debug, StructOpt)]
enum Subcommand {
    /// Write a default scene file
    #[structopt(name = "init")]
    Init {
        dest: PathBuf,

        #[structopt(long = "width", default_value = "800")]
        width: u32,

        #[structopt(long = "height", default_value = "600")]
        height: u32,
    },

    /// Render the escape-time field to a grayscale PNG
    #[structopt(name = "render")]
    Render {
        #[structopt(flatten)]
        scene: SceneOptions,

        #[structopt(long = "dest")]
        dest: Option<PathBuf>,

        /// Show a progress bar while evaluating
        #[structopt(long = "progress")]
        progress: bool,
    },

    /// Trace the orbit of a grid cell and print it as JSON
    #[structopt(name = "orbit")]
    Orbit {
        #[structopt(flatten)]
        scene: SceneOptions,

        #[structopt(long = "x")]
        x: u32,

        #[structopt(long = "y")]
        y: u32,
    },
}

#[derive(Debug, StructOpt)]
#[structopt(name = "celtic-orbit")]
struct Command {
    #[structopt(subcommand)]
    subcommand: Subcommand,
}

fn time_fn<T, U>(desc: &str, f: T) -> U
where
    T: FnOnce() -> U,
{
    let start = Instant::now();
    let result: U = f();
    log::info!("{} elapsed: {:?}", desc, start.elapsed());
    result
}

fn init(dest: PathBuf, width: u32, height: u32) -> Result<(), Error> {
    let scene = Scene::for_bounds(Bounds { width, height });
    scene.save(&dest)?;
    log::info!("wrote {}", dest.display());
    Ok(())
}

/// Render a fractal field from the given scene
fn render(opts: SceneOptions, dest: Option<PathBuf>, progress: bool) -> Result<(), Error> {
    let scene = opts.build()?;
    log::info!(
        "rendering formula {} at zoom {} over {:?}",
        scene.formula,
        scene.viewport.zoom(),
        scene.viewport.bounds()
    );

    let field = if progress {
        let bar = ProgressBar::new(0);
        bar.set_style(
            ProgressStyle::with_template(
                "[{elapsed_precise}] {percent}% {wide_bar:cyan/blue} {pos:>7}/{len:7} ({per_sec}) [eta: {eta_precise}]",
            )
            .unwrap_or_else(|_| ProgressStyle::default_bar()),
        );
        time_fn("field", || scene.field_with_progress(bar))
    } else {
        time_fn("field", || scene.field())
    };
    log::info!("{:.1}% of cells escaped", field.escaped_fraction() * 100.);

    let output_path = dest
        .or_else(|| opts.scene.as_ref().map(|p| p.with_extension("png")))
        .unwrap_or_else(|| PathBuf::from("field.png"));

    let img = time_fn("coloring", || render::grayscale(&field));
    img.save(&output_path)?;
    log::info!("wrote {}", output_path.display());
    Ok(())
}

/// Trace the orbit under a grid cell and print a JSON report
fn orbit(opts: SceneOptions, x: u32, y: u32) -> Result<(), Error> {
    let scene = opts.build()?;
    let pos = Pos { x, y };

    let orbit = match scene.orbit_at(pos) {
        Some(orbit) => orbit,
        None => {
            return Err(Error::Parse(format!(
                "{},{} is outside {:?}",
                x,
                y,
                scene.viewport.bounds()
            )))
        }
    };

    let (seed, constant) = scene.mode.seed_and_constant(scene.viewport.to_complex(pos));
    log::info!(
        "orbit period [{}]: {}",
        scene.formula.index(),
        orbit.step_count()
    );

    let report = serde_json::json!({
        "formula": scene.formula,
        "seed": seed,
        "constant": constant,
        "outcome": orbit.outcome(),
        "step_count": orbit.step_count(),
        "tone_hz": render::tone_frequency(orbit.step_count()),
        "points": orbit.points(),
    });

    let stdout = std::io::stdout();
    serde_json::to_writer_pretty(stdout.lock(), &report)?;
    println!();
    Ok(())
}

fn main() -> Result<(), Error> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cmd = Command::from_args();

    match cmd.subcommand {
        Subcommand::Init { dest, width, height } => init(dest, width, height),
        Subcommand::Render {
            scene,
            dest,
            progress,
        } => render(scene, dest, progress),
        Subcommand::Orbit { scene, x, y } => orbit(scene, x, y),
    }
}
