use crate::infra::FleetState;
use clap::Args;
use fleet_routing::config::FleetConfig;
use fleet_routing::dataset::{export_problem, seed_problem, DatasetMarshaller};
use fleet_routing::error::AppError;
use fleet_routing::RoutingProblem;
use std::path::PathBuf;

const SAMPLE_DATASET: &str = include_str!("../../../demos/belgium.yaml");

#[derive(Args, Debug)]
pub(crate) struct DatasetArgs {
    /// YAML dataset to read
    pub(crate) path: PathBuf,
    /// Write the output here instead of stdout
    #[arg(long)]
    pub(crate) output: Option<PathBuf>,
}

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Dataset to seed the fleet with. Defaults to the bundled Belgium sample.
    #[arg(long)]
    pub(crate) dataset: Option<PathBuf>,
    /// How many vehicles to retire with remove-any.
    #[arg(long, default_value_t = 1)]
    pub(crate) retire: usize,
    /// Capacity given to the extra default vehicle the demo adds.
    #[arg(long, allow_negative_numbers = true)]
    pub(crate) capacity: Option<i32>,
}

pub(crate) fn run_dataset_show(args: DatasetArgs) -> Result<(), AppError> {
    let problem = DatasetMarshaller::from_path(&args.path)?;
    emit(&describe_problem(&problem), args.output)
}

pub(crate) fn run_dataset_export(args: DatasetArgs) -> Result<(), AppError> {
    let problem = DatasetMarshaller::from_path(&args.path)?;
    emit(&DatasetMarshaller::marshal(&problem)?, args.output)
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let problem = match &args.dataset {
        Some(path) => DatasetMarshaller::from_path(path)?,
        None => DatasetMarshaller::unmarshal_str(SAMPLE_DATASET)?,
    };

    println!("Fleet routing demo");
    print!("{}", describe_problem(&problem));

    let yaml = run_demo_session(&problem, &args)?;
    println!("\nResulting dataset\n{yaml}");
    Ok(())
}

/// Seed a throwaway fleet, mutate it, print planner traffic, and return the
/// final state as YAML.
fn run_demo_session(problem: &RoutingProblem, args: &DemoArgs) -> Result<String, AppError> {
    let fleet = FleetState::new(problem.name(), &FleetConfig::default());
    let service = fleet.service.as_ref();
    let summary = seed_problem(problem, fleet.locations.as_ref(), service)?;
    println!(
        "\nSeeded {} locations and {} vehicles",
        summary.locations, summary.vehicles
    );

    match service.create_vehicle() {
        Ok(vehicle) => {
            println!("Added default vehicle {vehicle}");
            if let Some(capacity) = args.capacity {
                match service.change_capacity(vehicle.id(), capacity) {
                    Ok(updated) => println!("Changed capacity: {updated}"),
                    Err(err) => println!("Capacity change failed: {err}"),
                }
            }
        }
        Err(err) => println!("Could not add default vehicle: {err}"),
    }

    for _ in 0..args.retire {
        match service.remove_any_vehicle() {
            Ok(Some(vehicle)) => println!("Retired {vehicle}"),
            Ok(None) => {
                println!("Fleet is empty, nothing left to retire");
                break;
            }
            Err(err) => println!("Retirement failed: {err}"),
        }
    }

    println!("\nPlanner received");
    for event in fleet.planner.events() {
        println!("- {event}");
    }
    if !service.divergences().is_empty() {
        println!("{} planner updates pending", service.divergences().len());
    }

    let snapshot = export_problem(problem.name(), fleet.locations.as_ref(), fleet.vehicles.as_ref())?;
    Ok(DatasetMarshaller::marshal(&snapshot)?)
}

fn describe_problem(problem: &RoutingProblem) -> String {
    let mut out = String::new();
    let name = if problem.name().is_empty() {
        "<unnamed>"
    } else {
        problem.name()
    };
    out.push_str(&format!("Problem: {name}\n"));
    match problem.depot() {
        Some(depot) => out.push_str(&format!("Depot: {depot} at {}\n", depot.coordinates())),
        None => out.push_str("Depot: none\n"),
    }
    out.push_str(&format!("Vehicles ({})\n", problem.vehicles().len()));
    for vehicle in problem.vehicles() {
        out.push_str(&format!("- {vehicle}, capacity {}\n", vehicle.capacity()));
    }
    out.push_str(&format!("Visits ({})\n", problem.visits().len()));
    for visit in problem.visits() {
        let skill = if visit.required_skill().is_empty() {
            String::new()
        } else {
            format!(" needs {}", visit.required_skill())
        };
        out.push_str(&format!("- {visit} at {}{skill}\n", visit.coordinates()));
    }
    out
}

fn emit(text: &str, output: Option<PathBuf>) -> Result<(), AppError> {
    match output {
        Some(path) => std::fs::write(path, text)?,
        None => print!("{text}"),
    }
    Ok(())
}
