// File: ./src/cli.rs
//! Command-line front end: argument parsing, help text and the commands
//! themselves. The binary only sets up logging and the context.
use crate::archive::{ArchiveOutcome, BidArchive, DirectoryArchive, Submission};
use crate::catalog::{HISTORICAL_PROJECTS, LABOR_RATES, PROJECT_TEMPLATES, find_template};
use crate::config::Config;
use crate::context::AppContext;
use crate::document::{self, RenderOptions};
use crate::model::{Bid, ClientInfo, ParsedScopeItem, parse_scope};
use crate::pricing::{self, compute_totals, format_currency};
use crate::storage::LocalStorage;
use anyhow::{Context, Result};
use std::fs;
use std::io::Read;
use std::path::PathBuf;

/// Where scope text comes from: a file, or stdin for `-` / no argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    Stdin,
    File(PathBuf),
}

impl Input {
    fn from_arg(arg: Option<&String>) -> Self {
        match arg.map(String::as_str) {
            None | Some("-") => Input::Stdin,
            Some(path) => Input::File(PathBuf::from(path)),
        }
    }

    pub fn read(&self) -> Result<String> {
        match self {
            Input::Stdin => {
                let mut buf = String::new();
                std::io::stdin()
                    .read_to_string(&mut buf)
                    .context("Failed to read scope text from stdin")?;
                Ok(buf)
            }
            Input::File(path) => fs::read_to_string(path)
                .with_context(|| format!("Failed to read scope file {:?}", path)),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Help,
    Parse {
        input: Input,
    },
    Price {
        input: Input,
        rate: Option<f64>,
        markup: Option<f64>,
        square_footage: Option<f64>,
    },
    New {
        client: String,
        address: String,
        input: Option<Input>,
        template: Option<String>,
        quantity: Option<u32>,
    },
    Import {
        input: Input,
    },
    List,
    Show {
        id: String,
    },
    Delete {
        id: String,
    },
    Archive {
        id: String,
        force: bool,
    },
    Templates,
    Rates,
}

/// Global flags plus the command.
#[derive(Debug, Clone, PartialEq)]
pub struct Invocation {
    pub root: Option<PathBuf>,
    pub verbose: bool,
    pub command: Command,
}

fn flag_value<'a>(args: &'a [String], i: usize, flag: &str) -> Result<&'a String> {
    args.get(i + 1)
        .ok_or_else(|| anyhow::anyhow!("{} requires a value", flag))
}

fn parse_number<T: std::str::FromStr>(value: &str, flag: &str) -> Result<T> {
    value
        .parse()
        .map_err(|_| anyhow::anyhow!("Invalid value for {}: '{}'", flag, value))
}

/// Parse `args` (without the program name).
pub fn parse_args(args: &[String]) -> Result<Invocation> {
    let mut root = None;
    let mut verbose = false;
    let mut rest: Vec<String> = Vec::new();

    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "-r" | "--root" => {
                root = Some(PathBuf::from(flag_value(args, i, "--root")?));
                i += 2;
            }
            "-v" | "--verbose" => {
                verbose = true;
                i += 1;
            }
            _ => {
                rest.push(args[i].clone());
                i += 1;
            }
        }
    }

    let command = parse_command(&rest)?;
    Ok(Invocation {
        root,
        verbose,
        command,
    })
}

fn parse_command(args: &[String]) -> Result<Command> {
    let Some(name) = args.first() else {
        return Ok(Command::Help);
    };
    let args = &args[1..];

    let mut positional: Vec<&String> = Vec::new();
    let mut rate = None;
    let mut markup = None;
    let mut square_footage = None;
    let mut client = None;
    let mut address = None;
    let mut template = None;
    let mut quantity = None;
    let mut force = false;

    let mut i = 0;
    while i < args.len() {
        let arg = args[i].as_str();
        match arg {
            "--rate" => {
                rate = Some(parse_number(flag_value(args, i, arg)?, arg)?);
                i += 2;
            }
            "--markup" => {
                markup = Some(parse_number(flag_value(args, i, arg)?, arg)?);
                i += 2;
            }
            "--sqft" => {
                square_footage = Some(parse_number(flag_value(args, i, arg)?, arg)?);
                i += 2;
            }
            "--client" => {
                client = Some(flag_value(args, i, arg)?.clone());
                i += 2;
            }
            "--address" => {
                address = Some(flag_value(args, i, arg)?.clone());
                i += 2;
            }
            "--template" => {
                template = Some(flag_value(args, i, arg)?.clone());
                i += 2;
            }
            "--quantity" => {
                quantity = Some(parse_number(flag_value(args, i, arg)?, arg)?);
                i += 2;
            }
            "--force" => {
                force = true;
                i += 1;
            }
            _ if arg.starts_with("--") => {
                return Err(anyhow::anyhow!("Unknown option '{}'", arg));
            }
            _ => {
                positional.push(&args[i]);
                i += 1;
            }
        }
    }

    let id = |cmd: &str| -> Result<String> {
        positional
            .first()
            .map(|s| s.to_string())
            .ok_or_else(|| anyhow::anyhow!("'{}' requires a bid id", cmd))
    };

    let command = match name.as_str() {
        "help" | "-h" | "--help" => Command::Help,
        "parse" => Command::Parse {
            input: Input::from_arg(positional.first().copied()),
        },
        "price" => Command::Price {
            input: Input::from_arg(positional.first().copied()),
            rate,
            markup,
            square_footage,
        },
        "new" => {
            let client = client.ok_or_else(|| anyhow::anyhow!("'new' requires --client"))?;
            let address = address.ok_or_else(|| anyhow::anyhow!("'new' requires --address"))?;
            // Without a template the scope text is mandatory, from a file or stdin.
            let input = if positional.is_empty() && template.is_some() {
                None
            } else {
                Some(Input::from_arg(positional.first().copied()))
            };
            Command::New {
                client,
                address,
                input,
                template,
                quantity,
            }
        }
        "import" => Command::Import {
            input: Input::from_arg(positional.first().copied()),
        },
        "list" => Command::List,
        "show" => Command::Show { id: id("show")? },
        "delete" => Command::Delete { id: id("delete")? },
        "archive" => Command::Archive {
            id: id("archive")?,
            force,
        },
        "templates" => Command::Templates,
        "rates" => Command::Rates,
        other => return Err(anyhow::anyhow!("Unknown command '{}'", other)),
    };
    Ok(command)
}

/// Resolve a full or shortened bid id to exactly one saved bid.
fn resolve_bid(ctx: &dyn AppContext, id: &str) -> Result<Bid> {
    let mut matches = LocalStorage::find_by_prefix(ctx, id)?;
    match matches.len() {
        0 => Err(anyhow::anyhow!("No bid with id '{}'", id)),
        1 => Ok(matches.remove(0)),
        n => Err(anyhow::anyhow!(
            "Bid id '{}' is ambiguous ({} matches)",
            id,
            n
        )),
    }
}

pub fn run(ctx: &dyn AppContext, command: Command) -> Result<()> {
    let config = Config::load_or_default(ctx)?;

    match command {
        Command::Help => print_help("bidscope"),
        Command::Parse { input } => {
            let parsed = parse_scope(&input.read()?);
            println!("{}", serde_json::to_string_pretty(&parsed)?);
        }
        Command::Price {
            input,
            rate,
            markup,
            square_footage,
        } => {
            let parsed = parse_scope(&input.read()?);
            let rate = rate.unwrap_or(config.labor_rate);
            let markup = markup.unwrap_or(config.markup_percentage);
            print_price(&parsed.project_name, &parsed.items, rate, markup);
            if let Some(sqft) = square_footage {
                match pricing::estimate_from_historical(sqft, HISTORICAL_PROJECTS) {
                    Some(estimate) => println!(
                        "    Past projects suggest {} - {} (avg {}) for {} sq ft",
                        format_currency(estimate.min),
                        format_currency(estimate.max),
                        format_currency(estimate.average),
                        sqft
                    ),
                    None => println!("    No historical estimate for {} sq ft", sqft),
                }
            }
        }
        Command::New {
            client,
            address,
            input,
            template,
            quantity,
        } => {
            let mut bid = config.new_bid(ClientInfo {
                name: client,
                property_address: address,
                ..ClientInfo::default()
            });
            if let Some(input) = input {
                let parsed = parse_scope(&input.read()?);
                if bid.add_parsed(&parsed) == 0 {
                    log::warn!("No scope items found in input");
                }
            }
            if let Some(template_id) = template {
                let template = find_template(&template_id)
                    .ok_or_else(|| anyhow::anyhow!("Unknown template '{}'", template_id))?;
                bid.add_template(template, None, quantity, 1);
            }
            LocalStorage::save_bid(ctx, &bid)?;
            println!("{}", bid.id);
        }
        Command::Import { input } => {
            let mut bid = Bid::from_import_json(&input.read()?)?;
            bid.company = config.company.clone();
            bid.change_order_markup = config.change_order_markup;
            bid.show_cost_plus_language = config.show_cost_plus_language;
            LocalStorage::save_bid(ctx, &bid)?;
            println!("{}", bid.id);
        }
        Command::List => {
            let bids = LocalStorage::load(ctx)?;
            if bids.is_empty() {
                println!("No saved bids.");
            }
            for bid in bids {
                println!(
                    "{}  {}  {:<24} {:<32} {:>12}",
                    &bid.id[..8.min(bid.id.len())],
                    bid.created_at.format("%Y-%m-%d"),
                    bid.client.name,
                    bid.client.property_address,
                    format_currency(bid.totals.total_bid)
                );
            }
        }
        Command::Show { id } => {
            let bid = resolve_bid(ctx, &id)?;
            let options = RenderOptions {
                page_height: config.page_height,
                page_width: config.page_width,
            };
            print!("{}", document::render(&bid, &options));
        }
        Command::Delete { id } => {
            let bid = resolve_bid(ctx, &id)?;
            LocalStorage::delete_bid(ctx, &bid.id)?;
            println!("Deleted bid {} ({})", bid.id, bid.client.name);
        }
        Command::Archive { id, force } => {
            let bid = resolve_bid(ctx, &id)?;
            let options = RenderOptions {
                page_height: config.page_height,
                page_width: config.page_width,
            };
            let rendered = document::render(&bid, &options).to_text();
            let file_name = bid
                .document_file_name
                .clone()
                .unwrap_or_else(|| "estimate.txt".to_string());
            let submission = Submission::from_bid(&bid).with_document(&file_name, rendered.into_bytes());
            let archive = DirectoryArchive::new(config.archive_root(ctx)?);

            match archive.submit(&submission, force)? {
                ArchiveOutcome::Saved { location } => {
                    println!("Archived to {}", location.display());
                }
                ArchiveOutcome::Partial { location, failures } => {
                    println!("Partially archived to {}", location.display());
                    for failure in failures {
                        println!("    failed: {}", failure);
                    }
                }
                ArchiveOutcome::Conflict { key } => {
                    println!(
                        "A submission '{}' already exists. Re-run with --force to override it.",
                        key
                    );
                }
            }
        }
        Command::Templates => {
            for template in PROJECT_TEMPLATES {
                println!(
                    "{:<20} {:<28} {:<14} {} - {}",
                    template.id,
                    template.name,
                    template.category,
                    format_currency(template.average_cost.low),
                    format_currency(template.average_cost.high)
                );
            }
        }
        Command::Rates => {
            for rate in LABOR_RATES {
                println!(
                    "{:<32} {:>6}/hr  min {:>6}{}",
                    rate.trade,
                    format_currency(rate.hourly_rate),
                    format_currency(rate.minimum_charge),
                    if rate.is_internal { "  (crew)" } else { "" }
                );
            }
        }
    }
    Ok(())
}

fn print_price(
    project_name: &str,
    items: &[ParsedScopeItem],
    rate: f64,
    markup: f64,
) {
    let totals = compute_totals(items, rate, markup);
    println!("{}", project_name);
    for item in items {
        println!(
            "    {:<40} {:<18} {:>10} {:>6}h",
            item.description,
            item.category,
            format_currency(item.material_cost),
            item.labor_hours
        );
    }
    println!();
    println!("    Materials: {}", format_currency(totals.material_costs));
    println!(
        "    Labor:     {} ({}/hr)",
        format_currency(totals.labor_costs),
        format_currency(rate)
    );
    println!("    Base:      {}", format_currency(totals.base_cost));
    println!("    Markup:    {} ({}%)", format_currency(totals.markup), markup);
    println!("    Total:     {}", format_currency(totals.total_bid));
}

pub fn print_help(binary_name: &str) {
    println!(
        "Bidscope v{} - Cost-plus bid builder for remodeling work",
        env!("CARGO_PKG_VERSION")
    );
    println!();
    println!("USAGE:");
    println!("    {} [--root <path>] [--verbose] <command>", binary_name);
    println!();
    println!("OPTIONS:");
    println!("    -r, --root <path>     Use a different directory for config and data.");
    println!("    -v, --verbose         Log parser and storage decisions to stderr.");
    println!("    -h, --help            Show this help message.");
    println!();
    println!("COMMANDS:");
    println!("    parse [<file>|-]                      Print the parsed scope as JSON");
    println!("    price [<file>|-] [--rate N] [--markup P] [--sqft N]");
    println!("                                          Parse and price a scope");
    println!("    new --client <name> --address <addr> [<file>|-] [--template <id> [--quantity N]]");
    println!("                                          Create and save a bid, print its id");
    println!("    import [<file>|-]                     Save a bid from archive import JSON");
    println!("    list                                  List saved bids");
    println!("    show <id>                             Render a saved bid as a document");
    println!("    delete <id>                           Delete a saved bid");
    println!("    archive <id> [--force]                Submit a bid to the archive");
    println!("    templates                             List project templates");
    println!("    rates                                 List labor rates");
    println!();
    println!("Ids may be shortened to any unique prefix.");
    println!();
    println!("SCOPE TEXT:");
    println!("    Kitchen Renovation:                   Section header (ends with ':')");
    println!("    - Install cabinets - $8000 materials, 24 hours");
    println!("    - Replace windows (10 windows @ $300 each)");
    println!("    - Remove existing cabinets (8 hours)");
    println!("    Notes: customer supplies tile         Notes for the current section");
    println!("    Project: Smith Kitchen                Project name");
    println!();
    println!("EXAMPLES:");
    println!("    {} price scope.txt --markup 25", binary_name);
    println!(
        "    {} new --client \"Stuart Wilson\" --address \"735 Green Meadow Dr, Austin\" scope.txt",
        binary_name
    );
    println!("    {} new --client Lee --address \"12 Oak St\" --template roof-asphalt --quantity 30", binary_name);
    println!("    {} archive 3f2a --force", binary_name);
}
