//! State Vector Frame Transformation Tool
//!
//! This binary transforms a satellite position (and optionally velocity)
//! between the TEME, TIRS and ITRS reference frames at a given UTC
//! instant, using the bundled Earth-orientation table.
//!
//! Usage:
//!   cargo run --bin transform_state -- \
//!       --time 2020-04-12T00:00:00Z \
//!       --from TEME --to ITRS \
//!       --position "-4437.95,2662.40,4396.67" \
//!       --velocity "-3.68,-5.62,0.63" [--json]

use clap::{ArgAction, Parser};
use satpass::earthlib::BundledEop;
use satpass::{Cartesian3, Frame, FrameGraph, StateVector, Timescale};

/// Type alias for the error type used throughout this module
type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;

/// State Vector Frame Transformation Tool
#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Transforms a satellite state between TEME, TIRS and ITRS",
    long_about = None
)]
struct Args {
    /// UTC instant, ISO 8601 (e.g. 2020-04-12T00:00:00Z)
    #[arg(short, long)]
    time: String,

    /// Source frame (TEME, TIRS or ITRS)
    #[arg(long, default_value = "TEME")]
    from: String,

    /// Target frame (TEME, TIRS or ITRS)
    #[arg(long, default_value = "ITRS")]
    to: String,

    /// Position in km, comma separated: "x,y,z"
    #[arg(short, long, allow_hyphen_values = true)]
    position: String,

    /// Velocity in km/s, comma separated: "x,y,z"
    #[arg(short, long, allow_hyphen_values = true)]
    velocity: Option<String>,

    /// Emit JSON instead of text
    #[arg(long, action = ArgAction::SetTrue)]
    json: bool,
}

/// Parse a "x,y,z" triple into a vector
fn parse_vector(text: &str) -> Result<Cartesian3> {
    let parts: Vec<f64> = text
        .split(',')
        .map(|p| p.trim().parse::<f64>())
        .collect::<std::result::Result<_, _>>()?;
    if parts.len() != 3 {
        return Err(format!("expected three components, got {}: {text:?}", parts.len()).into());
    }
    Ok(Cartesian3::new(parts[0], parts[1], parts[2]))
}

fn main() -> Result<()> {
    let args = Args::parse();

    let ts = Timescale::default();
    let time = ts.parse_utc(&args.time)?;
    let from: Frame = args.from.parse()?;
    let to: Frame = args.to.parse()?;

    let mut state = StateVector::new(from, time, parse_vector(&args.position)?);
    if let Some(velocity) = &args.velocity {
        state = state.with_velocity(parse_vector(velocity)?);
    }

    let graph = FrameGraph::standard(BundledEop::bundled());
    let transformed = graph.transform(&state, to)?;

    if args.json {
        let payload = serde_json::json!({
            "frame": transformed.frame.name(),
            "time_utc": args.time,
            "position_km": [
                transformed.position.x,
                transformed.position.y,
                transformed.position.z,
            ],
            "velocity_km_s": transformed
                .velocity
                .map(|v| vec![v.x, v.y, v.z]),
        });
        println!("{}", serde_json::to_string_pretty(&payload)?);
    } else {
        println!("{} -> {}", state, transformed);
    }

    Ok(())
}
