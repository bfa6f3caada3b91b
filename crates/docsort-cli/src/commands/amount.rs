//! Amount command - parse a locale-formatted number.

use clap::Args;

use docsort_core::parse_locale_amount;
use docsort_core::text::{amount_shape, format_european};

/// Arguments for the amount command.
#[derive(Args)]
pub struct AmountArgs {
    /// Raw amount, e.g. "1.234,56" or "4,070.00"
    #[arg(required = true, allow_hyphen_values = true)]
    raw: String,

    /// Also show the detected separator shape
    #[arg(long)]
    explain: bool,
}

pub async fn run(args: AmountArgs) -> anyhow::Result<()> {
    let amount = parse_locale_amount(&args.raw)?;

    if args.explain {
        println!("{:?}: {} ({})", amount_shape(&args.raw), amount, format_european(amount));
    } else {
        println!("{}", amount);
    }
    Ok(())
}
