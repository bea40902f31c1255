//! # Command Line
//!
//! Argument parsing and dispatch. Every subcommand maps onto one function in
//! [`crate::commands`]; results go to stdout as pretty JSON, except the
//! quote document and the daily export which are printed as they are.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::Serialize;

use workshop_core::{PhotoSlot, TaskStatus};

use crate::commands::order::ReceptionUpdate;
use crate::commands::task::{CostUpdate, TaskUpdate};
use crate::commands::{auth, budget, export, order, task};
use crate::error::ApiError;
use crate::state::{ConfigState, DbState, SessionState};

#[derive(Parser, Debug)]
#[command(name = "workshop", version, about = "Work orders, task board and quotes for a repair shop")]
pub struct Cli {
    /// SQLite database file
    #[arg(long, global = true, env = "WORKSHOP_DB_PATH")]
    pub db: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Open a new work order in reception
    New,

    /// List all work orders, newest first
    List,

    /// Show one work order
    Show { order_id: String },

    /// Fill in vehicle and client details
    Reception(ReceptionArgs),

    /// Set the inspection photo for one slot
    Photo {
        order_id: String,
        #[arg(value_enum)]
        slot: SlotArg,
        uri: String,
        #[arg(long, default_value = "")]
        note: String,
    },

    /// Mark the vehicle as delivered
    Deliver { order_id: String },

    /// Delete a work order and its tasks
    Delete { order_id: String },

    /// Task board operations
    #[command(subcommand)]
    Task(TaskCommand),

    /// Budget for the current role
    Budget { order_id: String },

    /// Client-facing quote
    #[command(subcommand)]
    Quote(QuoteCommand),

    /// Unlock the admin role with the PIN
    Login { pin: String },

    /// Continue as mechanic
    Mechanic,

    /// Forget the remembered login
    Logout,

    /// Print the current role
    Whoami,

    /// Change the admin PIN (admin only)
    Pin { new_pin: String },

    /// JSON backup of one day's orders (admin only)
    Export {
        /// Day to export, YYYY-MM-DD (UTC). Defaults to today.
        #[arg(long)]
        date: Option<NaiveDate>,
    },
}

#[derive(Args, Debug)]
pub struct ReceptionArgs {
    pub order_id: String,
    #[arg(long)]
    pub vin: Option<String>,
    #[arg(long)]
    pub plates: Option<String>,
    #[arg(long)]
    pub brand: Option<String>,
    #[arg(long)]
    pub model: Option<String>,
    #[arg(long)]
    pub year: Option<String>,
    #[arg(long)]
    pub color: Option<String>,
    #[arg(long)]
    pub engine: Option<String>,
    #[arg(long)]
    pub odometer: Option<String>,
    #[arg(long)]
    pub client_name: Option<String>,
    #[arg(long)]
    pub client_phone: Option<String>,
    #[arg(long)]
    pub reason: Option<String>,
}

impl From<ReceptionArgs> for ReceptionUpdate {
    fn from(args: ReceptionArgs) -> Self {
        ReceptionUpdate {
            vin: args.vin,
            plates: args.plates,
            brand: args.brand,
            model: args.model,
            year: args.year,
            color: args.color,
            engine: args.engine,
            odometer: args.odometer,
            client_name: args.client_name,
            client_phone: args.client_phone,
            reason_for_visit: args.reason,
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum TaskCommand {
    /// Add a pending task
    Add { order_id: String, description: String },

    /// Edit description, mechanic, hours or notes
    Update {
        order_id: String,
        task_id: String,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        mechanic: Option<String>,
        #[arg(long)]
        hours: Option<String>,
        #[arg(long)]
        notes: Option<String>,
    },

    /// Move a task to another column
    Move {
        order_id: String,
        task_id: String,
        #[arg(value_enum)]
        status: StatusArg,
    },

    /// Remove a task
    Delete { order_id: String, task_id: String },

    /// Set costs. Real costs need the admin role.
    Costs {
        order_id: String,
        task_id: String,
        #[arg(long)]
        sale: Option<String>,
        #[arg(long)]
        labor_sale: Option<String>,
        #[arg(long)]
        real: Option<String>,
        #[arg(long)]
        labor_real: Option<String>,
    },

    /// Attach an evidence photo
    Photo {
        order_id: String,
        task_id: String,
        uri: String,
        #[arg(long, default_value = "")]
        note: String,
    },
}

#[derive(Subcommand, Debug)]
pub enum QuoteCommand {
    /// Printable HTML quote
    Html { order_id: String },

    /// WhatsApp link with the quote summary
    Whatsapp { order_id: String },
}

/// Kanban column as typed on the command line.
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum StatusArg {
    Pending,
    InProgress,
    Completed,
}

impl From<StatusArg> for TaskStatus {
    fn from(arg: StatusArg) -> Self {
        match arg {
            StatusArg::Pending => TaskStatus::Pending,
            StatusArg::InProgress => TaskStatus::InProgress,
            StatusArg::Completed => TaskStatus::Completed,
        }
    }
}

/// Inspection slot as typed on the command line.
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum SlotArg {
    Front,
    Rear,
    Left,
    Right,
    InteriorFront,
    InteriorRear,
}

impl From<SlotArg> for PhotoSlot {
    fn from(arg: SlotArg) -> Self {
        match arg {
            SlotArg::Front => PhotoSlot::Front,
            SlotArg::Rear => PhotoSlot::Rear,
            SlotArg::Left => PhotoSlot::Left,
            SlotArg::Right => PhotoSlot::Right,
            SlotArg::InteriorFront => PhotoSlot::InteriorFront,
            SlotArg::InteriorRear => PhotoSlot::InteriorRear,
        }
    }
}

// =============================================================================
// Dispatch
// =============================================================================

fn to_json<T: Serialize>(value: &T) -> Result<String, ApiError> {
    serde_json::to_string_pretty(value)
        .map_err(|e| ApiError::internal(format!("Output serialization failed: {}", e)))
}

/// Runs one command and returns what should be printed.
pub async fn execute(
    command: Command,
    db: &DbState,
    session: &SessionState,
    config: &ConfigState,
) -> Result<String, ApiError> {
    match command {
        Command::New => to_json(&order::create_order(db, session).await?),
        Command::List => to_json(&order::list_orders(db).await?),
        Command::Show { order_id } => to_json(&order::get_order(db, session, &order_id).await?),
        Command::Reception(args) => {
            let order_id = args.order_id.clone();
            to_json(&order::update_reception(db, session, &order_id, args.into()).await?)
        }
        Command::Photo {
            order_id,
            slot,
            uri,
            note,
        } => to_json(
            &order::set_inspection_photo(db, session, &order_id, slot.into(), &uri, &note).await?,
        ),
        Command::Deliver { order_id } => {
            to_json(&order::deliver_order(db, session, &order_id).await?)
        }
        Command::Delete { order_id } => {
            order::delete_order(db, &order_id).await?;
            to_json(&serde_json::json!({ "deleted": order_id }))
        }
        Command::Task(cmd) => execute_task(cmd, db, session).await,
        Command::Budget { order_id } => to_json(&budget::get_budget(db, session, &order_id).await?),
        Command::Quote(QuoteCommand::Html { order_id }) => {
            budget::client_quote_html(db, config, &order_id).await
        }
        Command::Quote(QuoteCommand::Whatsapp { order_id }) => {
            to_json(&budget::client_whatsapp_link(db, config, &order_id).await?)
        }
        Command::Login { pin } => to_json(&auth::login(db, session, &pin).await?),
        Command::Mechanic => to_json(&auth::login_as_mechanic(db, session).await?),
        Command::Logout => {
            auth::logout(db, session).await?;
            to_json(&serde_json::json!({ "role": auth::current_role(session) }))
        }
        Command::Whoami => to_json(&serde_json::json!({ "role": auth::current_role(session) })),
        Command::Pin { new_pin } => {
            auth::change_admin_pin(db, session, &new_pin).await?;
            to_json(&serde_json::json!({ "changed": true }))
        }
        Command::Export { date } => export::export_daily(db, session, date).await,
    }
}

async fn execute_task(
    cmd: TaskCommand,
    db: &DbState,
    session: &SessionState,
) -> Result<String, ApiError> {
    let detail = match cmd {
        TaskCommand::Add {
            order_id,
            description,
        } => task::add_task(db, session, &order_id, &description).await?,
        TaskCommand::Update {
            order_id,
            task_id,
            description,
            mechanic,
            hours,
            notes,
        } => {
            let update = TaskUpdate {
                description,
                mechanic_name: mechanic,
                hours_worked: hours,
                notes,
            };
            task::update_task(db, session, &order_id, &task_id, update).await?
        }
        TaskCommand::Move {
            order_id,
            task_id,
            status,
        } => task::move_task(db, session, &order_id, &task_id, status.into()).await?,
        TaskCommand::Delete { order_id, task_id } => {
            task::delete_task(db, session, &order_id, &task_id).await?
        }
        TaskCommand::Costs {
            order_id,
            task_id,
            sale,
            labor_sale,
            real,
            labor_real,
        } => {
            let costs = CostUpdate {
                sale_cost: sale,
                labor_sale_cost: labor_sale,
                real_cost: real,
                labor_real_cost: labor_real,
            };
            task::update_task_costs(db, session, &order_id, &task_id, costs).await?
        }
        TaskCommand::Photo {
            order_id,
            task_id,
            uri,
            note,
        } => task::add_task_photo(db, session, &order_id, &task_id, &uri, &note).await?,
    };
    to_json(&detail)
}
