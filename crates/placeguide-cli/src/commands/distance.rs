//! Distance command implementation

use crate::cli::DistanceArgs;
use crate::output::OutputWriter;
use crate::output_types::DistanceOutput;
use anyhow::Result;
use placeguide_core::distance::{distance_meters, walking_minutes};

pub fn execute(args: DistanceArgs, output: &OutputWriter) -> Result<()> {
    let meters = distance_meters(args.from, args.to);
    let minutes = walking_minutes(meters);

    if output.is_json() {
        output.result(DistanceOutput {
            from: args.from,
            to: args.to,
            meters,
            walking_minutes: minutes,
        })?;
    } else {
        output.kv("From", args.from);
        output.kv("To", args.to);
        output.kv("Distance", format!("{:.1} m", meters));
        output.kv("Walking", format!("{:.1} min", minutes));
    }

    Ok(())
}
