//! CLI entry point for the DMA-330 disassembler binary.

use std::env;
use std::ffi::OsString;
use std::fs;
use std::path::PathBuf;

use disas_core::render_listing;
#[cfg(test)]
use tempfile as _;

const USAGE_TEXT: &str = "\
Usage: dma330-disas <input> [options]

Options:
  -b, --base-address <addr>  Base address added to printed addresses
                             (decimal or 0x-prefixed hex, default 0)
  -h, --help                 Show this help message

Examples:
  dma330-disas program.bin
  dma330-disas program.bin -b 0x40000000
";

#[derive(Debug, PartialEq, Eq)]
struct Args {
    input: PathBuf,
    base_address: u64,
}

#[derive(Debug)]
enum ParseResult {
    Args(Args),
    Help,
}

fn parse_base_address(text: &str) -> Result<u64, String> {
    let parsed = text
        .strip_prefix("0x")
        .or_else(|| text.strip_prefix("0X"))
        .map_or_else(|| text.parse(), |hex| u64::from_str_radix(hex, 16));
    parsed.map_err(|_| format!("invalid base address: {text}"))
}

#[allow(clippy::while_let_on_iterator)]
fn parse_args(mut args: impl Iterator<Item = OsString>) -> Result<ParseResult, String> {
    let mut input: Option<PathBuf> = None;
    let mut base_address = 0u64;

    while let Some(arg) = args.next() {
        if arg == "--help" || arg == "-h" {
            return Ok(ParseResult::Help);
        }

        if arg == "-b" || arg == "--base-address" {
            let value = args
                .next()
                .ok_or_else(|| "missing value for -b".to_string())?;
            base_address = parse_base_address(&value.to_string_lossy())?;
            continue;
        }

        if arg.to_string_lossy().starts_with('-') {
            return Err(format!("unknown option: {}", arg.to_string_lossy()));
        }

        if input.is_some() {
            return Err("multiple input paths provided".to_string());
        }
        input = Some(PathBuf::from(arg));
    }

    let input = input.ok_or_else(|| "missing input path".to_string())?;
    Ok(ParseResult::Args(Args {
        input,
        base_address,
    }))
}

fn run(args: &Args) -> Result<(), i32> {
    let data = match fs::read(&args.input) {
        Ok(data) => data,
        Err(e) => {
            eprintln!("error: failed to read {}: {e}", args.input.display());
            return Err(1);
        }
    };

    match render_listing(&data, args.base_address) {
        Ok(listing) => {
            if !listing.is_empty() {
                println!("{listing}");
            }
            Ok(())
        }
        Err(e) => {
            eprintln!("error: {e}");
            Err(1)
        }
    }
}

fn main() {
    let exit_code = match parse_args(env::args_os().skip(1)) {
        Ok(ParseResult::Help) => {
            println!("{USAGE_TEXT}");
            0
        }
        Ok(ParseResult::Args(args)) => match run(&args) {
            Ok(()) => 0,
            Err(code) => code,
        },
        Err(error) => {
            eprintln!("error: {error}");
            eprintln!("{USAGE_TEXT}");
            1
        }
    };

    std::process::exit(exit_code);
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::ffi::OsString;
    use std::path::PathBuf;

    #[test]
    fn parses_input_with_base_address() {
        let result = parse_args(
            [
                OsString::from("program.bin"),
                OsString::from("-b"),
                OsString::from("0x40000000"),
            ]
            .into_iter(),
        )
        .expect("valid args should parse");

        let ParseResult::Args(args) = result else {
            panic!("expected parsed args");
        };
        assert_eq!(
            args,
            Args {
                input: PathBuf::from("program.bin"),
                base_address: 0x4000_0000,
            }
        );
    }

    #[test]
    fn base_address_defaults_to_zero() {
        let result = parse_args([OsString::from("program.bin")].into_iter())
            .expect("valid args should parse");
        let ParseResult::Args(args) = result else {
            panic!("expected parsed args");
        };
        assert_eq!(args.base_address, 0);
    }

    #[test]
    fn parses_decimal_and_hex_base_addresses() {
        assert_eq!(parse_base_address("4096"), Ok(4096));
        assert_eq!(parse_base_address("0x1000"), Ok(0x1000));
        assert_eq!(parse_base_address("0X1000"), Ok(0x1000));
        assert!(parse_base_address("banana").is_err());
        assert!(parse_base_address("-1").is_err());
    }

    #[test]
    fn parses_help_flag() {
        let result = parse_args([OsString::from("--help")].into_iter())
            .expect("help should parse without error");
        assert!(matches!(result, ParseResult::Help));
    }

    #[test]
    fn rejects_unknown_option() {
        let error = parse_args([OsString::from("--frobnicate")].into_iter())
            .expect_err("unknown option should fail parse");
        assert!(error.contains("unknown option"));
    }

    #[test]
    fn rejects_missing_input() {
        let error = parse_args(std::iter::empty()).expect_err("missing input should fail");
        assert!(error.contains("missing input"));
    }

    #[test]
    fn rejects_multiple_inputs() {
        let error = parse_args([OsString::from("a.bin"), OsString::from("b.bin")].into_iter())
            .expect_err("two inputs should fail");
        assert!(error.contains("multiple input paths"));
    }

    #[test]
    fn rejects_missing_base_address_value() {
        let error = parse_args([OsString::from("a.bin"), OsString::from("-b")].into_iter())
            .expect_err("dangling -b should fail");
        assert!(error.contains("missing value for -b"));
    }
}
