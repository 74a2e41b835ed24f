//! `sample-bug` command

use crate::core::error::ReleaseResult;
use crate::sample::BadSample;

/// Run the sample-bug command
///
/// Arguments are joined with spaces first, so `0, 512, 480` and `0,512,480`
/// parse the same way whether or not the shell split them.
pub fn run_sample(dump: &[String], json: bool) -> ReleaseResult<()> {
  let sample = BadSample::from_dump(&dump.join(" "))?;

  if json {
    println!("{}", serde_json::to_string_pretty(&sample)?);
  } else {
    print!("{}", sample.render_chart());
  }
  Ok(())
}
