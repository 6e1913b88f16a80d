//! fleet-backoffice: command-line front end for the fleet management API.

use std::fs::File;
use std::future::Future;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use dotenvy::dotenv;
use serde::de::DeserializeOwned;

use fleet_backoffice::domain::rider::Rider;
use fleet_backoffice::domain::shift::Shift;
use fleet_backoffice::domain::vehicle::Vehicle;
use fleet_backoffice::domain::spare_part::SparePart;
use fleet_backoffice::dto::mutation::MutationOutcome;
use fleet_backoffice::dto::riders::RidersQuery;
use fleet_backoffice::dto::vehicles::VehiclesQuery;
use fleet_backoffice::forms::riders::AddRiderForm;
use fleet_backoffice::forms::spare_parts::StockAdjustmentForm;
use fleet_backoffice::forms::vehicles::{ReturnVehicleForm, TakeVehicleForm};
use fleet_backoffice::gateway::http::HttpGateway;
use fleet_backoffice::gateway::memory::InMemoryGateway;
use fleet_backoffice::gateway::{GatewayReader, GatewayWriter};
use fleet_backoffice::models::config::ClientConfig;
use fleet_backoffice::resource::ResourceView;
use fleet_backoffice::services::{
    ServiceError, ServiceResult, dashboard, housing, reports, riders, shifts, spare_parts,
    vehicles,
};
use fleet_backoffice::session::{Credentials, Session};

#[derive(Parser, Debug)]
#[command(name = "fleet-backoffice")]
#[command(version, about, long_about = None)]
struct Cli {
    /// YAML configuration file; `FLEET__*` variables override it
    #[arg(short, long, env = "FLEET_CONFIG")]
    config: Option<PathBuf>,

    /// Serve reads from a JSON fixture file instead of the live API
    #[arg(long)]
    fixtures: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List riders
    Riders {
        #[arg(short, long)]
        search: Option<String>,
        #[arg(short, long, default_value_t = 1)]
        page: usize,
    },

    /// Show one rider
    Rider { id: i32 },

    /// List vehicles
    Vehicles {
        /// Only vehicles that can be taken
        #[arg(long)]
        available: bool,
        #[arg(short, long)]
        search: Option<String>,
        #[arg(short, long, default_value_t = 1)]
        page: usize,
    },

    /// Look a vehicle up by plate number
    Vehicle { plate: String },

    /// List housing units, or show one with its residents
    Housing {
        name: Option<String>,
        #[arg(short, long)]
        search: Option<String>,
    },

    /// List spare parts with inventory totals
    Parts {
        #[arg(short, long)]
        search: Option<String>,
    },

    /// Shifts of one day or of one rider
    Shifts {
        /// Day as YYYY-MM-DD
        #[arg(long, required_unless_present = "rider", conflicts_with = "rider")]
        date: Option<NaiveDate>,
        /// Rider iqama number
        #[arg(long)]
        rider: Option<String>,
    },

    /// Export a CSV report
    #[command(subcommand)]
    Report(ReportCommands),

    /// Fleet, rider and inventory statistics
    Dashboard,

    /// Register a rider
    AddRider {
        name: String,
        iqama: String,
        #[arg(long, default_value = "")]
        phone: String,
        #[arg(long, default_value = "")]
        housing: String,
        /// Join date as YYYY-MM-DD
        #[arg(long, default_value = "")]
        join_date: String,
    },

    /// Remove a rider
    DeleteRider { id: i32 },

    /// Hand a vehicle to a rider
    Take { plate: String, iqama: String },

    /// Return a vehicle to the pool
    Return { plate: String, mileage: String },

    /// Set the stock level of a spare part
    Stock { id: i32, quantity: String },
}

#[derive(Subcommand, Debug)]
enum ReportCommands {
    /// Shifts and bills of one rider
    Rider {
        iqama: String,
        #[arg(short, long)]
        out: PathBuf,
    },

    /// All shifts of one day
    Daily {
        #[arg(long)]
        date: NaiveDate,
        #[arg(short, long)]
        out: PathBuf,
    },
}

fn open_session(config: &ClientConfig) -> std::io::Result<Session> {
    if let Some(token) = &config.token {
        return Ok(Session::new(Some(Credentials::new(token.clone()))));
    }
    match &config.token_file {
        Some(path) => Session::load(path),
        None => Ok(Session::anonymous()),
    }
}

enum Backend {
    Fixtures(Arc<InMemoryGateway>),
    Api {
        gateway: Arc<HttpGateway>,
        session: Session,
    },
}

fn build_backend(config: &ClientConfig, fixtures: Option<&Path>) -> Result<Backend, String> {
    if let Some(path) = fixtures {
        log::info!("Serving requests from fixtures at {}", path.display());
        let gateway = InMemoryGateway::from_fixture_file(path)
            .map_err(|e| format!("Failed to load fixtures: {e}"))?;
        return Ok(Backend::Fixtures(Arc::new(gateway)));
    }

    let session = open_session(config).map_err(|e| format!("Failed to read token file: {e}"))?;
    if !session.is_authenticated() {
        log::warn!("No token configured, requests are sent anonymously");
    }
    let gateway = HttpGateway::new(config, session.clone())
        .map_err(|e| format!("Failed to build client: {e}"))?;
    Ok(Backend::Api {
        gateway: Arc::new(gateway),
        session,
    })
}

/// Drops a token file whose token the API rejected during this run.
fn forget_rejected_token(config: &ClientConfig, session: &Session) {
    let Some(path) = &config.token_file else {
        return;
    };
    if config.token.is_some() || session.is_authenticated() {
        return;
    }
    match session.persist(path) {
        Ok(()) => log::info!("Cleared token file {}", path.display()),
        Err(err) => log::warn!("Failed to clear token file {}: {err}", path.display()),
    }
}

fn print_riders(riders: &[Rider]) {
    for rider in riders {
        println!(
            "{:>5}  {:<28} {:<12} {:<12} {}",
            rider.id,
            rider.name,
            rider.iqama_no,
            rider.status,
            rider.vehicle_plate.as_deref().unwrap_or("-")
        );
    }
}

fn print_vehicles(vehicles: &[Vehicle]) {
    for vehicle in vehicles {
        println!(
            "{:<12} {:<18} {:<18} {}",
            vehicle.plate_number,
            vehicle.status,
            vehicle.rider_name.as_deref().unwrap_or("-"),
            vehicle.rider_iqama.as_deref().unwrap_or("-")
        );
    }
}

fn print_shifts(shifts: &[Shift]) {
    for shift in shifts {
        let date = shift
            .date
            .map(|d| d.to_string())
            .unwrap_or_else(|| "-".to_string());
        println!(
            "{:<10} {:<28} {:>6.1}h {:>5} orders",
            date, shift.rider_name, shift.hours_worked, shift.orders
        );
    }
}

fn print_pages(pages: &[Option<usize>], current: usize) {
    let links: Vec<String> = pages
        .iter()
        .map(|page| match page {
            Some(p) if *p == current => format!("[{p}]"),
            Some(p) => p.to_string(),
            None => "…".to_string(),
        })
        .collect();
    if !links.is_empty() {
        println!("pages: {}", links.join(" "));
    }
}

fn create_report_file(path: &Path) -> ServiceResult<File> {
    File::create(path).map_err(|e| ServiceError::Export(csv::Error::from(e)))
}

/// Sends one write through `view` and reports the refreshed list size.
async fn submit<T, G, F>(view: &ResourceView<T, G>, mutation: F) -> ServiceResult<()>
where
    T: DeserializeOwned + Clone + Send,
    G: GatewayReader + ?Sized,
    F: Future<Output = ServiceResult<MutationOutcome>>,
{
    let outcome = view.mutate_and_refresh(mutation).await?;
    println!("{}", outcome.alert.message);
    match view.state().error() {
        Some(err) => log::warn!("Refresh of {} failed: {}", view.resource(), err.detail),
        None => println!("{} entries in {}", view.items().len(), view.resource()),
    }
    Ok(())
}

async fn run<G>(cli: Cli, config: &ClientConfig, api: Arc<G>) -> ServiceResult<()>
where
    G: GatewayReader + GatewayWriter + 'static,
{
    let gateway = api.as_ref();
    match cli.command {
        Commands::Riders { search, page } => {
            let query = RidersQuery {
                search,
                page: Some(page),
            };
            let data = riders::load_riders_page(gateway, query, config.items_per_page).await?;
            print_riders(&data.riders.items);
            println!("{} riders", data.riders.total);
            print_pages(&data.riders.pages, data.riders.page);
        }
        Commands::Rider { id } => {
            let rider = riders::load_rider(gateway, id).await?;
            print_riders(std::slice::from_ref(&rider));
            if let Some(housing) = &rider.housing_name {
                println!("housing: {housing}");
            }
        }
        Commands::Vehicles {
            available,
            search,
            page,
        } => {
            let query = VehiclesQuery {
                search,
                page: Some(page),
                available_only: available,
            };
            let data = vehicles::load_vehicles_page(gateway, query, config.items_per_page).await?;
            print_vehicles(&data.vehicles.items);
            println!("{} vehicles", data.vehicles.total);
            print_pages(&data.vehicles.pages, data.vehicles.page);
        }
        Commands::Vehicle { plate } => {
            let vehicle = vehicles::find_vehicle_by_plate(gateway, &plate).await?;
            print_vehicles(std::slice::from_ref(&vehicle));
        }
        Commands::Housing {
            name: Some(name), ..
        } => {
            let unit = housing::load_housing(gateway, &name).await?;
            println!("{} ({})", unit.name, unit.address.as_deref().unwrap_or("-"));
            if let Some(vacancies) = unit.vacancies() {
                println!("vacancies: {vacancies}");
            }
            print_riders(&unit.riders);
        }
        Commands::Housing { name: None, search } => {
            let data = housing::load_housing_page(gateway, search).await?;
            for unit in &data.units {
                println!(
                    "{:<24} {:>4} residents  capacity {}",
                    unit.name,
                    unit.riders.len(),
                    unit.capacity.map_or("-".to_string(), |c| c.to_string())
                );
            }
            println!(
                "{} residents, total capacity {}",
                data.total_residents, data.total_capacity
            );
        }
        Commands::Parts { search } => {
            let data = spare_parts::load_spare_parts_page(gateway, search).await?;
            for part in &data.parts {
                println!(
                    "{:>5}  {:<28} {:>5} x {:>8.2}",
                    part.id, part.name, part.quantity, part.price
                );
            }
            println!(
                "{} parts, {} units, value {:.2}, {} low on stock",
                data.summary.parts,
                data.summary.units,
                data.summary.value,
                data.summary.low_stock.len()
            );
        }
        Commands::Shifts { date, rider } => {
            let data = match (date, rider) {
                (_, Some(iqama)) => shifts::load_rider_shifts(gateway, &iqama).await?,
                (Some(date), None) => shifts::load_daily_shifts(gateway, date).await?,
                (None, None) => return Ok(()),
            };
            print_shifts(&data.shifts);
            println!(
                "{} shifts, {} orders, {:.1} hours, {:.1} orders per shift",
                data.totals.shifts,
                data.totals.total_orders,
                data.totals.total_hours,
                data.totals.average_orders
            );
        }
        Commands::Report(ReportCommands::Rider { iqama, out }) => {
            let report = reports::rider_history_report(gateway, &iqama).await?;
            reports::write_rider_history_csv(&report, create_report_file(&out)?)?;
            log::info!("Rider history written to {}", out.display());
        }
        Commands::Report(ReportCommands::Daily { date, out }) => {
            let report = reports::daily_details_report(gateway, date).await?;
            reports::write_daily_details_csv(&report, create_report_file(&out)?)?;
            log::info!("Daily details written to {}", out.display());
        }
        Commands::Dashboard => {
            let data = dashboard::load_dashboard(gateway).await?;
            let json = serde_json::to_string_pretty(&data)?;
            println!("{json}");
        }
        Commands::AddRider {
            name,
            iqama,
            phone,
            housing,
            join_date,
        } => {
            let form = AddRiderForm {
                name,
                iqama_no: iqama,
                phone,
                housing_name: housing,
                join_date,
                ..AddRiderForm::default()
            };
            let view: ResourceView<Rider, G> =
                ResourceView::new(api.clone(), riders::riders_resource());
            submit(&view, riders::add_rider(gateway, &form)).await?;
        }
        Commands::DeleteRider { id } => {
            let view: ResourceView<Rider, G> =
                ResourceView::new(api.clone(), riders::riders_resource());
            submit(&view, riders::delete_rider(gateway, id)).await?;
        }
        Commands::Take { plate, iqama } => {
            let form = TakeVehicleForm {
                plate_number: plate,
                rider_iqama: iqama,
            };
            let view: ResourceView<Vehicle, G> =
                ResourceView::new(api.clone(), vehicles::vehicles_resource(true));
            submit(&view, vehicles::take_vehicle(gateway, &form)).await?;
        }
        Commands::Return { plate, mileage } => {
            let form = ReturnVehicleForm {
                plate_number: plate,
                mileage,
            };
            let view: ResourceView<Vehicle, G> =
                ResourceView::new(api.clone(), vehicles::vehicles_resource(true));
            submit(&view, vehicles::return_vehicle(gateway, &form)).await?;
        }
        Commands::Stock { id, quantity } => {
            let current = spare_parts::load_spare_parts_page(gateway, None).await?;
            let part = current
                .parts
                .iter()
                .find(|part| part.id == id)
                .ok_or(ServiceError::NotFound)?;
            let form = StockAdjustmentForm {
                id,
                current_quantity: part.quantity,
                quantity,
            };
            let view: ResourceView<SparePart, G> =
                ResourceView::new(api.clone(), spare_parts::spare_parts_resource());
            submit(&view, spare_parts::adjust_stock(gateway, &form)).await?;
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenv().ok();
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    let cli = Cli::parse();

    let config = match ClientConfig::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(err) => {
            log::error!("Error loading client config: {err}");
            return ExitCode::FAILURE;
        }
    };

    let backend = match build_backend(&config, cli.fixtures.as_deref()) {
        Ok(backend) => backend,
        Err(err) => {
            log::error!("{err}");
            return ExitCode::FAILURE;
        }
    };

    let result = match &backend {
        Backend::Fixtures(gateway) => run(cli, &config, gateway.clone()).await,
        Backend::Api { gateway, session } => {
            let result = run(cli, &config, gateway.clone()).await;
            forget_rejected_token(&config, session);
            result
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::error!("{err}");
            eprintln!("{}", err.user_message());
            ExitCode::FAILURE
        }
    }
}
