use clap::{Parser, ValueEnum};
use log::LevelFilter;

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

#[derive(Debug, Parser)]
#[command(version, about, long_about = None)]
pub struct Args {
    /// the input path to the scene file
    pub scene: String,
    /// the path where the rendered image is saved, the format follows the extension
    #[arg(short, long, default_value = "output.png")]
    pub output: String,
    /// rotation of the faces around the depth axis, in radians
    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
    pub theta: f64,
    /// rotation of the faces around the vertical axis, in radians
    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
    pub phi: f64,
    /// side in image pixels of the square drawn for every traced ray
    #[arg(short, long, default_value_t = 8, value_parser = clap::value_parser!(u32).range(1..))]
    pub pixel_scale: u32,
    /// maximum number of reflections of a ray, overrides the scene file
    #[arg(short, long)]
    pub bounces: Option<u32>,
    /// logging level
    #[arg(long, value_enum, default_value_t = LogLevel::Info)]
    pub log_level: LogLevel,
}
