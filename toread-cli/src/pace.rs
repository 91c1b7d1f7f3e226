use std::process::ExitCode;

use toread_lib::pace::Estimate;

#[derive(clap::Args, Debug, Clone)]
pub struct Args {
    /// Number of pages in the book
    #[arg(long)]
    pages: u32,
    /// Number of days to finish it in
    #[arg(long)]
    days: u32,
}

pub fn handle(args: &Args) -> ExitCode {
    match Estimate::new(args.pages, args.days) {
        Some(estimate) => {
            println!("{estimate}");
            sysexits::ExitCode::Ok.into()
        }
        None => {
            eprintln!("Pages and days must both be at least 1");
            sysexits::ExitCode::Usage.into()
        }
    }
}
