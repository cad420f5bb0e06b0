use clap::Parser;

use crate::charset::Charset;

#[derive(Parser, Debug)]
#[command(name = "unzip-enc")]
#[command(version)]
#[command(about = "List and extract ZIP files, repairing legacy filename encodings", long_about = None)]
#[command(after_help = "Examples:\n  \
  unzip-enc -l data.zip                 list, guessing the filename encoding\n  \
  unzip-enc data.zip -O gbk shift_jis   extract, trying GBK then Shift_JIS\n  \
  unzip-enc -d out -O cp932 -- a.zip    extract a.zip into out/ as Shift_JIS")]
pub struct Cli {
    /// ZIP files to process, in order
    #[arg(value_name = "FILE", required = true)]
    pub files: Vec<String>,

    /// List files instead of extracting
    #[arg(short = 'l', long = "list")]
    pub list: bool,

    /// Extract files into exdir
    #[arg(short = 'd', value_name = "EXDIR", default_value = ".")]
    pub extract_dir: String,

    /// Filename encodings to try, in order, before auto-detection
    #[arg(short = 'O', value_name = "ENC", num_args = 0..)]
    pub encodings: Vec<Charset>,

    /// Log more (-vv for debug); RUST_LOG overrides
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count)]
    pub verbose: u8,
}
