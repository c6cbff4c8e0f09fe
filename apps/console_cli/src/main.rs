mod table;

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use client_core::{
    config::{default_config_paths, load_settings},
    forms::{SelectedCity, SelectedUser},
    listing::{SortKeyOption, BUS_SORT_KEYS, CITY_SORT_KEYS, USER_SORT_KEYS},
    BusForm, CityForm, ConsoleClient, ListingQuery, StopDraft,
};
use serde::Serialize;
use shared::domain::{CityId, SortOrder, UserId};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(about = "Bus admin console (headless)")]
struct Cli {
    /// Config file to load instead of the default search paths.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Overrides the configured API base URL.
    #[arg(long)]
    api_url: Option<String>,
    /// Print listings as JSON instead of a table.
    #[arg(long)]
    json: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OrderArg {
    Asc,
    Desc,
}

impl From<OrderArg> for SortOrder {
    fn from(value: OrderArg) -> Self {
        match value {
            OrderArg::Asc => SortOrder::Asc,
            OrderArg::Desc => SortOrder::Desc,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List buses with owner and city names resolved.
    Buses {
        #[arg(long, default_value_t = 1)]
        page: u32,
        #[arg(long, default_value = "busNumber")]
        sort: String,
        #[arg(long, value_enum, default_value = "asc")]
        order: OrderArg,
    },
    /// List cities and their stops.
    Cities {
        #[arg(long, default_value_t = 1)]
        page: u32,
        #[arg(long, default_value = "createdAt")]
        sort: String,
    },
    /// List users of one account type.
    Users {
        #[arg(long, default_value_t = 1)]
        page: u32,
        #[arg(long, default_value = "name")]
        sort: String,
        #[arg(long, value_enum, default_value = "asc")]
        order: OrderArg,
        #[arg(long, default_value = "Staff")]
        filter: String,
    },
    CreateBus {
        #[arg(long)]
        owner: String,
        #[arg(long)]
        number: String,
        #[arg(long)]
        capacity: u32,
        #[arg(long)]
        source: String,
        #[arg(long)]
        destination: String,
        /// City pincode; repeat in travel order.
        #[arg(long = "rest-stop")]
        rest_stops: Vec<String>,
        /// User id; repeatable.
        #[arg(long = "staff")]
        staff: Vec<String>,
    },
    CreateCity {
        #[arg(long)]
        name: String,
        #[arg(long)]
        pincode: String,
        /// `name|HH:MM|minutes`; repeatable.
        #[arg(long = "stop", value_parser = parse_stop_draft)]
        stops: Vec<StopDraft>,
    },
    AddStop {
        pincode: String,
        #[arg(long)]
        name: String,
        #[arg(long)]
        timings: String,
        #[arg(long)]
        duration: u32,
    },
    DeleteStop {
        pincode: String,
        stop_id: String,
    },
}

fn parse_stop_draft(raw: &str) -> Result<StopDraft, String> {
    let mut parts = raw.split('|').map(str::trim);
    let (Some(name), Some(timings), Some(duration), None) =
        (parts.next(), parts.next(), parts.next(), parts.next())
    else {
        return Err(format!("expected name|HH:MM|minutes, got '{raw}'"));
    };
    let stop_duration = duration
        .parse::<u32>()
        .map_err(|err| format!("invalid stop duration '{duration}': {err}"))?;
    Ok(StopDraft {
        stop_name: name.to_string(),
        stop_timings: timings.to_string(),
        stop_duration,
    })
}

fn checked_sort_key(options: &[SortKeyOption], key: String) -> Result<String> {
    if options.iter().any(|option| option.key == key) {
        return Ok(key);
    }
    let known: Vec<&str> = options.iter().map(|option| option.key).collect();
    bail!("unknown sort key '{key}'; expected one of {}", known.join(", "))
}

fn print_listing<T: Serialize>(
    json: bool,
    items: &[T],
    headers: &[&str],
    rows: Vec<Vec<String>>,
    empty_text: &str,
    page: u32,
    total_pages: u32,
) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(items)?);
        return Ok(());
    }
    if items.is_empty() {
        println!("{empty_text}");
        return Ok(());
    }
    println!("{}", table::render(headers, &rows));
    if total_pages > 1 {
        println!("page {page} of {total_pages}");
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let mut settings = load_settings(cli.config.as_deref(), &default_config_paths())?;
    if let Some(api_url) = cli.api_url {
        settings.api_base_url = api_url;
    }

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&settings.log_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let client = ConsoleClient::connect(&settings)?;
    tracing::debug!(command = ?cli.command, "running console command");

    match cli.command {
        Command::Buses { page, sort, order } => {
            let query = ListingQuery {
                page,
                sort_key: checked_sort_key(BUS_SORT_KEYS, sort)?,
                sort_order: Some(order.into()),
                ..ListingQuery::buses()
            };
            let result = client
                .bus_page(&query)
                .await
                .context("failed to load buses")?;
            print_listing(
                cli.json,
                &result.items,
                table::BUS_HEADERS,
                table::bus_rows(&result.items),
                "No Buses Found",
                page,
                result.total_pages,
            )?;
        }
        Command::Cities { page, sort } => {
            let query = ListingQuery {
                page,
                sort_key: checked_sort_key(CITY_SORT_KEYS, sort)?,
                ..ListingQuery::cities()
            };
            let result = client
                .city_page(&query)
                .await
                .context("failed to load cities")?;
            print_listing(
                cli.json,
                &result.items,
                table::CITY_HEADERS,
                table::city_rows(&result.items),
                "No Cities Found",
                page,
                result.total_pages,
            )?;
        }
        Command::Users {
            page,
            sort,
            order,
            filter,
        } => {
            let query = ListingQuery {
                page,
                sort_key: checked_sort_key(USER_SORT_KEYS, sort)?,
                sort_order: Some(order.into()),
                filter: Some(filter),
                ..ListingQuery::staff_users()
            };
            let result = client
                .user_page(&query)
                .await
                .context("failed to load users")?;
            print_listing(
                cli.json,
                &result.items,
                table::USER_HEADERS,
                table::user_rows(&result.items),
                "No Users Found",
                page,
                result.total_pages,
            )?;
        }
        Command::CreateBus {
            owner,
            number,
            capacity,
            source,
            destination,
            rest_stops,
            staff,
        } => {
            let mut form = BusForm {
                owner_id: Some(UserId::new(owner)),
                bus_number: number,
                bus_capacity: capacity,
                source: Some(CityId::new(source)),
                destination: Some(CityId::new(destination)),
                ..BusForm::default()
            };
            for pincode in rest_stops {
                form.select_rest_stop(SelectedCity {
                    id: CityId::new(pincode.clone()),
                    name: pincode,
                });
            }
            for user_id in staff {
                form.select_staff(SelectedUser {
                    id: UserId::new(user_id.clone()),
                    label: user_id,
                });
            }
            client.submit_bus(&form).await?;
            println!("Bus added successfully");
        }
        Command::CreateCity {
            name,
            pincode,
            stops,
        } => {
            let mut form = CityForm {
                city_name: name,
                city_pincode: pincode,
                ..CityForm::default()
            };
            for stop in stops {
                form.draft = stop;
                form.add_draft_stop()?;
            }
            client.submit_city(&form).await?;
            println!("City created successfully");
        }
        Command::AddStop {
            pincode,
            name,
            timings,
            duration,
        } => {
            let draft = StopDraft {
                stop_name: name,
                stop_timings: timings,
                stop_duration: duration,
            };
            client.add_stop(&pincode, &draft).await?;
            println!("Stop added to {pincode}");
        }
        Command::DeleteStop { pincode, stop_id } => {
            client.delete_stop(&pincode, &stop_id).await?;
            println!("Stop {stop_id} removed from {pincode}");
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_stop_argument() {
        let draft = parse_stop_draft("Taj Mahal | 10:00 | 30").expect("valid stop");
        assert_eq!(draft.stop_name, "Taj Mahal");
        assert_eq!(draft.stop_timings, "10:00");
        assert_eq!(draft.stop_duration, 30);

        assert!(parse_stop_draft("Taj|10:00").is_err());
        assert!(parse_stop_draft("Taj|10:00|30|extra").is_err());
        assert!(parse_stop_draft("Taj|10:00|half").is_err());
    }

    #[test]
    fn rejects_unknown_sort_keys() {
        assert_eq!(
            checked_sort_key(BUS_SORT_KEYS, "busCapacity".to_string()).expect("known key"),
            "busCapacity"
        );
        let err = checked_sort_key(CITY_SORT_KEYS, "pincode".to_string()).expect_err("unknown");
        assert!(err.to_string().contains("createdAt, cityName"));
    }

    #[test]
    fn cli_accepts_repeated_rest_stops() {
        let cli = Cli::try_parse_from([
            "console_cli",
            "--api-url",
            "http://localhost:5000",
            "create-bus",
            "--owner",
            "O1",
            "--number",
            "KA 01",
            "--capacity",
            "40",
            "--source",
            "110001",
            "--destination",
            "282001",
            "--rest-stop",
            "281001",
            "--rest-stop",
            "281121",
        ])
        .expect("valid args");
        match cli.command {
            Command::CreateBus { rest_stops, .. } => {
                assert_eq!(rest_stops, vec!["281001", "281121"]);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }
}
