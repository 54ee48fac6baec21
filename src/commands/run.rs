use std::fs;
use std::io::{self, Write};

use clap::Args;

use crate::cli_util::print_error;
use crate::config::settings;
use crate::Interpreter;

#[derive(Args, Debug)]
#[command(disable_help_flag = true)]
pub struct RunArgs {
    /// Print a step-by-step table of operations instead of the output
    #[arg(short = 't', long = "trace")]
    pub trace: bool,

    /// Read program code from PATH instead of positional "<code>"
    #[arg(short = 'f', long = "file")]
    pub file: Option<String>,

    /// Comma-separated byte values (0-255) consumed in order by ','
    #[arg(short = 'i', long = "input", value_name = "LIST")]
    pub input: Option<String>,

    /// Number of addressable tape cells (overrides bft.toml; default 100)
    #[arg(long = "capacity", value_name = "N")]
    pub capacity: Option<usize>,

    /// Concatenated program code parts
    #[arg(value_name = "code", trailing_var_arg = true)]
    pub code: Vec<String>,

    /// Show this help
    #[arg(short = 'h', long = "help", action = clap::ArgAction::SetTrue)]
    pub help: bool,
}

pub fn run(program: &str, args: RunArgs) -> i32 {
    if args.help {
        usage_and_exit(program, 0);
    }

    let RunArgs {
        trace,
        file,
        input,
        capacity,
        code,
        ..
    } = args;

    if file.is_none() && code.is_empty() {
        usage_and_exit(program, 2);
    }

    if file.is_some() && !code.is_empty() {
        eprintln!("{program}: cannot use positional code together with --file");
        usage_and_exit(program, 2);
    }

    let code_str = if let Some(path) = file {
        match fs::read_to_string(&path) {
            Ok(s) => s,
            Err(e) => {
                eprintln!("{program}: failed to read code file as UTF-8: {e}");
                let _ = io::stderr().flush();
                return 1;
            }
        }
    } else {
        code.join("")
    };

    let input_values = match input.as_deref().map(parse_input_list).transpose() {
        Ok(values) => values.unwrap_or_default(),
        Err(msg) => {
            eprintln!("{program}: invalid --input list: {msg}");
            let _ = io::stderr().flush();
            return 2;
        }
    };

    let capacity = capacity.unwrap_or(settings().tape_capacity);

    let mut bf = Interpreter::with_capacity(code_str, capacity);
    bf.set_input(input_values);

    let result = if trace { bf.run_traced() } else { bf.run() };

    match result {
        Ok(output) => {
            if !trace {
                print!("{output}");
            }
            // For readability, ensure output ends with a newline
            println!();
            let _ = io::stdout().flush();
            0
        }
        Err(err) => {
            print_error(Some(program), &err);
            1
        }
    }
}

/// Parse "65, 66,10" into byte values; u8 parsing enforces the 0-255 range.
fn parse_input_list(raw: &str) -> Result<Vec<u8>, String> {
    raw.split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(|part| {
            part.parse::<u8>()
                .map_err(|_| format!("'{part}' is not a byte value (0-255)"))
        })
        .collect()
}

fn usage_and_exit(program: &str, code: i32) -> ! {
    eprintln!(
        r#"Usage:
  {0} run [--trace|-t] [--input LIST] [--capacity N] "<code>"
  {0} run [--trace|-t] [--input LIST] [--capacity N] --file <PATH>

Options:
  --file,     -f <PATH>  Read program code from PATH instead of positional "<code>"
  --input,    -i <LIST>  Comma-separated byte values (0-255) consumed in order by ','
  --capacity <N>         Number of addressable tape cells (overrides bft.toml; default 100)
  --trace,    -t         Print a step-by-step table of operations instead of the output
  --help,     -h         Show this help

Notes:
- Characters outside of ><+-.,[] are comments and are ignored.
- Cells hold 0-255 and never wrap; leaving the range is an error.
- The pointer may not move below cell 0 or past the tape capacity.
- Loop bodies run once before the guard cell is first tested.
- When the --input list is exhausted, ',' reads 0.

Examples:
- Print the letter read from the input queue:
    {0} run --input 65 ",."
- Load program code from a file:
    {0} run --file ./program.bf
"#,
        program
    );
    let _ = io::stderr().flush();
    std::process::exit(code);
}
