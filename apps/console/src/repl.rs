//! # Line-Oriented Front End
//!
//! Parses one operator line into a [`Command`], runs it through the
//! command layer and renders the result as text.
//!
//! ## Command Reference
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Lookups                                                                │
//! │    search <products|customers|vehicles|technicians|services> [term]     │
//! │                                                                         │
//! │  Retail cart                                                            │
//! │    cart                      add <product-id> [qty]                     │
//! │    qty <item-id> <qty>       rm <item-id>                               │
//! │    customer <#n|id|none>     pay <cash|card|transfer|other|none>        │
//! │    discount <amount>         tax <amount|none>                          │
//! │    totals    submit    clear                                            │
//! │                                                                         │
//! │  Work order                                                             │
//! │    wo                        wo service <#n|id>                         │
//! │    wo service-qty <id> <n>   wo notes <id> [text]   wo rm-service <id>  │
//! │    wo part <product-id>      wo part-qty <id> <n>   wo rm-part <id>     │
//! │    wo vehicle|technician|customer <#n|id|none>                          │
//! │    wo intake|due <YYYY-MM-DD|today|none>                                │
//! │    wo odometer <km|none>     wo problem <text>   wo diagnosis <text|none>│
//! │    wo submit    wo clear                                                │
//! │                                                                         │
//! │  status    help    quit                                                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! `#n` picks the n-th row of the last search of that kind; a bare id must
//! also come from the last search, since selections carry the full record.

use std::sync::Arc;

use chrono::{Local, NaiveDate};
use thiserror::Error;

use shopfloor_client::{Notification, NotificationSink, SubmissionState};
use shopfloor_core::pricing::WORK_ORDER_TAX_RATE;
use shopfloor_core::{
    CustomerRef, Money, PaymentMethod, ProductRef, RetailTotals, ServiceRef, TechnicianRef, ValidationError,
    VehicleRef, WorkOrderTotals,
};

use crate::commands::cart::{self, CartResponse};
use crate::commands::lookup;
use crate::commands::submit::{self, SubmissionStatus};
use crate::commands::work_order::{self, WorkOrderResponse};
use crate::error::ApiError;
use crate::state::{ApiState, ConfigState, SessionState};

pub const HELP: &str = "\
search <products|customers|vehicles|technicians|services> [term]
cart | add <product-id> [qty] | qty <item-id> <qty> | rm <item-id>
customer <#n|id|none> | pay <cash|card|transfer|other|none>
discount <amount> | tax <amount|none> | totals | submit | clear
wo | wo service <#n|id> | wo service-qty <id> <n> | wo notes <id> [text]
wo rm-service <id> | wo part <product-id> | wo part-qty <id> <n> | wo rm-part <id>
wo vehicle|technician|customer <#n|id|none>
wo intake|due <YYYY-MM-DD|today|none> | wo odometer <km|none>
wo problem <text> | wo diagnosis <text|none> | wo submit | wo clear
status | help | quit";

// =============================================================================
// Commands
// =============================================================================

/// Which lookup a `search` runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    Products,
    Customers,
    Vehicles,
    Technicians,
    Services,
}

/// A selection from the last search results.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Pick {
    /// 1-based row number.
    Index(usize),
    Id(String),
    Clear,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Help,
    Quit,
    Status,
    Search { target: Target, term: String },

    Show,
    Add { product_id: String, quantity: Option<i64> },
    Qty { item_id: String, quantity: i64 },
    Remove { item_id: String },
    Customer(Pick),
    Pay(Option<PaymentMethod>),
    Discount(Money),
    Tax(Option<Money>),
    Totals,
    Submit,
    Clear,

    WorkOrder(WorkOrderCommand),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkOrderCommand {
    Show,
    Service(Pick),
    ServiceQty { id: String, quantity: i64 },
    Notes { id: String, text: String },
    RemoveService(String),
    Part(String),
    PartQty { id: String, quantity: i64 },
    RemovePart(String),
    Vehicle(Pick),
    Technician(Pick),
    Customer(Pick),
    Intake(Option<NaiveDate>),
    Due(Option<NaiveDate>),
    Odometer(Option<i64>),
    Problem(String),
    Diagnosis(Option<String>),
    Submit,
    Clear,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("Unknown command '{0}'. Type 'help' for the list")]
    Unknown(String),

    #[error("Usage: {0}")]
    Usage(&'static str),

    #[error("'{0}' is not a whole number")]
    NotANumber(String),

    #[error("'{0}' is not a date (expected YYYY-MM-DD, 'today' or 'none')")]
    NotADate(String),

    #[error(transparent)]
    Invalid(#[from] ValidationError),
}

// =============================================================================
// Parsing
// =============================================================================

fn split_word(s: &str) -> (&str, &str) {
    let s = s.trim();
    match s.split_once(char::is_whitespace) {
        Some((head, rest)) => (head, rest.trim()),
        None => (s, ""),
    }
}

fn required<'a>(s: &'a str, usage: &'static str) -> Result<&'a str, ParseError> {
    if s.is_empty() {
        Err(ParseError::Usage(usage))
    } else {
        Ok(s)
    }
}

fn parse_int(s: &str) -> Result<i64, ParseError> {
    s.parse::<i64>().map_err(|_| ParseError::NotANumber(s.to_string()))
}

fn parse_pick(s: &str, usage: &'static str) -> Result<Pick, ParseError> {
    let s = required(s, usage)?;
    if s.eq_ignore_ascii_case("none") {
        return Ok(Pick::Clear);
    }

    match s.strip_prefix('#') {
        Some(n) => match n.parse::<usize>() {
            Ok(index) if index > 0 => Ok(Pick::Index(index)),
            _ => Err(ParseError::Usage(usage)),
        },
        None => Ok(Pick::Id(s.to_string())),
    }
}

fn parse_date(s: &str) -> Result<Option<NaiveDate>, ParseError> {
    match s.to_lowercase().as_str() {
        "none" => Ok(None),
        "today" => Ok(Some(Local::now().date_naive())),
        _ => NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .map(Some)
            .map_err(|_| ParseError::NotADate(s.to_string())),
    }
}

fn parse_target(s: &str) -> Result<Target, ParseError> {
    const USAGE: &str = "search <products|customers|vehicles|technicians|services> [term]";
    match s.to_lowercase().as_str() {
        "products" | "product" | "p" => Ok(Target::Products),
        "customers" | "customer" | "c" => Ok(Target::Customers),
        "vehicles" | "vehicle" | "v" => Ok(Target::Vehicles),
        "technicians" | "technician" | "t" => Ok(Target::Technicians),
        "services" | "service" | "s" => Ok(Target::Services),
        _ => Err(ParseError::Usage(USAGE)),
    }
}

/// Parses one input line. Blank lines parse to `None`.
pub fn parse(line: &str) -> Result<Option<Command>, ParseError> {
    let (head, rest) = split_word(line);
    if head.is_empty() {
        return Ok(None);
    }

    let command = match head.to_lowercase().as_str() {
        "help" | "?" => Command::Help,
        "quit" | "exit" => Command::Quit,
        "status" => Command::Status,
        "search" | "find" => {
            let (target, term) = split_word(rest);
            Command::Search {
                target: parse_target(target)?,
                term: term.to_string(),
            }
        }

        "cart" | "show" => Command::Show,
        "add" => {
            const USAGE: &str = "add <product-id> [qty]";
            let (id, qty) = split_word(rest);
            Command::Add {
                product_id: required(id, USAGE)?.to_string(),
                quantity: if qty.is_empty() { None } else { Some(parse_int(qty)?) },
            }
        }
        "qty" => {
            const USAGE: &str = "qty <item-id> <qty>";
            let (id, qty) = split_word(rest);
            Command::Qty {
                item_id: required(id, USAGE)?.to_string(),
                quantity: parse_int(required(qty, USAGE)?)?,
            }
        }
        "rm" | "remove" => Command::Remove {
            item_id: required(rest, "rm <item-id>")?.to_string(),
        },
        "customer" => Command::Customer(parse_pick(rest, "customer <#n|id|none>")?),
        "pay" => match required(rest, "pay <cash|card|transfer|other|none>")? {
            m if m.eq_ignore_ascii_case("none") => Command::Pay(None),
            m => Command::Pay(Some(m.parse::<PaymentMethod>()?)),
        },
        "discount" => Command::Discount(Money::parse_major(required(rest, "discount <amount>")?)?),
        "tax" => match required(rest, "tax <amount|none>")? {
            t if t.eq_ignore_ascii_case("none") => Command::Tax(None),
            t => Command::Tax(Some(Money::parse_major(t)?)),
        },
        "totals" => Command::Totals,
        "submit" => Command::Submit,
        "clear" => Command::Clear,

        "wo" => Command::WorkOrder(parse_work_order(rest)?),
        other => return Err(ParseError::Unknown(other.to_string())),
    };

    Ok(Some(command))
}

fn parse_work_order(line: &str) -> Result<WorkOrderCommand, ParseError> {
    let (head, rest) = split_word(line);

    let command = match head.to_lowercase().as_str() {
        "" | "show" => WorkOrderCommand::Show,
        "service" => WorkOrderCommand::Service(parse_pick(rest, "wo service <#n|id>")?),
        "service-qty" => {
            const USAGE: &str = "wo service-qty <id> <n>";
            let (id, qty) = split_word(rest);
            WorkOrderCommand::ServiceQty {
                id: required(id, USAGE)?.to_string(),
                quantity: parse_int(required(qty, USAGE)?)?,
            }
        }
        "notes" => {
            let (id, text) = split_word(rest);
            WorkOrderCommand::Notes {
                id: required(id, "wo notes <id> [text]")?.to_string(),
                text: text.to_string(),
            }
        }
        "rm-service" => WorkOrderCommand::RemoveService(required(rest, "wo rm-service <id>")?.to_string()),
        "part" => WorkOrderCommand::Part(required(rest, "wo part <product-id>")?.to_string()),
        "part-qty" => {
            const USAGE: &str = "wo part-qty <id> <n>";
            let (id, qty) = split_word(rest);
            WorkOrderCommand::PartQty {
                id: required(id, USAGE)?.to_string(),
                quantity: parse_int(required(qty, USAGE)?)?,
            }
        }
        "rm-part" => WorkOrderCommand::RemovePart(required(rest, "wo rm-part <id>")?.to_string()),
        "vehicle" => WorkOrderCommand::Vehicle(parse_pick(rest, "wo vehicle <#n|id|none>")?),
        "technician" | "tech" => WorkOrderCommand::Technician(parse_pick(rest, "wo technician <#n|id|none>")?),
        "customer" => WorkOrderCommand::Customer(parse_pick(rest, "wo customer <#n|id|none>")?),
        "intake" => WorkOrderCommand::Intake(parse_date(required(rest, "wo intake <YYYY-MM-DD|today|none>")?)?),
        "due" => WorkOrderCommand::Due(parse_date(required(rest, "wo due <YYYY-MM-DD|today|none>")?)?),
        "odometer" | "km" => match required(rest, "wo odometer <km|none>")? {
            r if r.eq_ignore_ascii_case("none") => WorkOrderCommand::Odometer(None),
            r => WorkOrderCommand::Odometer(Some(parse_int(r)?)),
        },
        "problem" => WorkOrderCommand::Problem(rest.to_string()),
        "diagnosis" => {
            if rest.is_empty() || rest.eq_ignore_ascii_case("none") {
                WorkOrderCommand::Diagnosis(None)
            } else {
                WorkOrderCommand::Diagnosis(Some(rest.to_string()))
            }
        }
        "submit" => WorkOrderCommand::Submit,
        "clear" => WorkOrderCommand::Clear,
        other => return Err(ParseError::Unknown(format!("wo {}", other))),
    };

    Ok(command)
}

// =============================================================================
// Rendering
// =============================================================================

fn render_issues(err: &ApiError) -> String {
    err.issues
        .iter()
        .map(|issue| format!("\n  - {}", issue.message))
        .collect()
}

fn render_retail_totals(totals: &RetailTotals, config: &ConfigState) -> String {
    let money = |m: Money| config.format_currency(m);
    let mut out = format!("Subtotal  {}\n", money(totals.subtotal));
    if !totals.discount.is_zero() {
        out.push_str(&format!("Discount  -{}\n", money(totals.discount)));
    }
    let manual = if totals.tax_is_manual { " (manual)" } else { "" };
    out.push_str(&format!("Tax       {}{}\n", money(totals.tax), manual));
    out.push_str(&format!("Total     {}  ({} items)", money(totals.total), totals.item_count));
    out
}

fn render_work_order_totals(totals: &WorkOrderTotals, config: &ConfigState) -> String {
    let money = |m: Money| config.format_currency(m);
    let tax_label = format!("Tax {}%", WORK_ORDER_TAX_RATE.percentage());
    format!(
        "Services  {}\nParts     {}\nSubtotal  {}\n{:<10}{}\nTotal     {}",
        money(totals.subtotal_services),
        money(totals.subtotal_parts),
        money(totals.subtotal),
        tax_label,
        money(totals.tax),
        money(totals.total)
    )
}

pub fn render_cart(cart: &CartResponse, config: &ConfigState) -> String {
    let mut out = String::new();

    if cart.items.is_empty() {
        out.push_str("Cart is empty\n");
    }
    for item in &cart.items {
        out.push_str(&format!(
            "  {}  {}  x{} @ {}  {}\n",
            item.id,
            item.name,
            item.quantity,
            config.format_currency(item.unit_price),
            config.format_currency(item.line_subtotal())
        ));
    }

    let customer = cart.customer.as_ref().map_or("-", |c| c.name.as_str());
    let payment = cart.payment_method.map_or_else(|| "-".to_string(), |m| m.to_string());
    out.push_str(&format!("Customer: {}  Payment: {}\n", customer, payment));
    out.push_str(&render_retail_totals(&cart.totals, config));
    out
}

pub fn render_work_order(order: &WorkOrderResponse, config: &ConfigState) -> String {
    let date = |d: Option<NaiveDate>| d.map_or_else(|| "-".to_string(), |d| d.to_string());
    let mut out = format!(
        "Vehicle: {}  Technician: {}  Customer: {}\n",
        order.vehicle.as_ref().map_or_else(|| "-".to_string(), VehicleRef::label),
        order.technician.as_ref().map_or("-", |t| t.name.as_str()),
        order.customer.as_ref().map_or("-", |c| c.name.as_str()),
    );
    out.push_str(&format!(
        "Intake: {}  Due: {}  Odometer: {}\n",
        date(order.intake_date),
        date(order.due_date),
        order.odometer.map_or_else(|| "-".to_string(), |km| format!("{} km", km)),
    ));
    out.push_str(&format!(
        "Problem: {}\nDiagnosis: {}\n",
        if order.problem_description.trim().is_empty() { "-" } else { order.problem_description.as_str() },
        order.diagnosis.as_deref().unwrap_or("-"),
    ));

    for s in &order.services {
        out.push_str(&format!(
            "  service {}  {}  x{} @ {}",
            s.id,
            s.name,
            s.quantity,
            config.format_currency(s.unit_price)
        ));
        if !s.notes.is_empty() {
            out.push_str(&format!("  ({})", s.notes));
        }
        out.push('\n');
    }
    for p in &order.parts {
        out.push_str(&format!(
            "  part {}  {}  x{} @ {}\n",
            p.id,
            p.name,
            p.quantity,
            config.format_currency(p.unit_price)
        ));
    }

    out.push_str(&render_work_order_totals(&order.totals, config));
    out
}

fn render_state(state: &SubmissionState) -> String {
    match state {
        SubmissionState::Idle => "idle".to_string(),
        SubmissionState::Submitting => "submitting".to_string(),
        SubmissionState::Succeeded { id } => format!("created {}", id),
        SubmissionState::Failed { reason } => format!("failed: {}", reason),
    }
}

fn render_status(status: &SubmissionStatus, config: &ConfigState) -> String {
    format!(
        "Sale: {}\nWork order: {}\nBack office: {}",
        render_state(&status.sale),
        render_state(&status.work_order),
        config.api_url
    )
}

fn render_rows<T>(rows: &[T], row: impl Fn(&T) -> String) -> String {
    if rows.is_empty() {
        return "No results".to_string();
    }
    rows.iter()
        .enumerate()
        .map(|(i, r)| format!("{:>3}. {}", i + 1, row(r)))
        .collect::<Vec<_>>()
        .join("\n")
}

// =============================================================================
// Repl
// =============================================================================

/// Rows from the most recent search of each kind.
#[derive(Debug, Default)]
struct SearchResults {
    products: Vec<ProductRef>,
    customers: Vec<CustomerRef>,
    vehicles: Vec<VehicleRef>,
    technicians: Vec<TechnicianRef>,
    services: Vec<ServiceRef>,
}

fn select<T: Clone>(rows: &[T], pick: &Pick, id_of: impl Fn(&T) -> &str, what: &str) -> Result<Option<T>, ApiError> {
    match pick {
        Pick::Clear => Ok(None),
        Pick::Index(n) => n
            .checked_sub(1)
            .and_then(|i| rows.get(i))
            .cloned()
            .map(Some)
            .ok_or_else(|| ApiError::not_found(what, &format!("#{}", n))),
        Pick::Id(id) => rows
            .iter()
            .find(|r| id_of(r) == id)
            .cloned()
            .map(Some)
            .ok_or_else(|| ApiError::not_found(what, &format!("{} (search first)", id))),
    }
}

/// One operator session driven by text lines.
pub struct Repl {
    api: ApiState,
    session: SessionState,
    config: ConfigState,
    sink: Arc<dyn NotificationSink>,
    results: SearchResults,
}

impl Repl {
    pub fn new(api: ApiState, config: ConfigState, sink: Arc<dyn NotificationSink>) -> Self {
        Repl {
            api,
            session: SessionState::new(),
            config,
            sink,
            results: SearchResults::default(),
        }
    }

    pub fn session(&self) -> &SessionState {
        &self.session
    }

    pub fn prompt(&self) -> String {
        format!("{}> ", self.config.store_name)
    }

    /// Runs one line. `None` means the operator asked to quit.
    pub async fn handle_line(&mut self, line: &str) -> Option<String> {
        let command = match parse(line) {
            Ok(Some(command)) => command,
            Ok(None) => return Some(String::new()),
            Err(e) => {
                self.sink.notify(Notification::warning("Invalid command", e.to_string()));
                return Some(String::new());
            }
        };

        if command == Command::Quit {
            return None;
        }

        match self.execute(command).await {
            Ok(text) => Some(text),
            Err(e) => {
                self.sink.notify(e.to_notification());
                Some(render_issues(&e).trim_start_matches('\n').to_string())
            }
        }
    }

    async fn execute(&mut self, command: Command) -> Result<String, ApiError> {
        let config = &self.config;
        let session = &self.session;

        let text = match command {
            Command::Help => HELP.to_string(),
            Command::Quit => String::new(),
            Command::Status => render_status(&submit::get_submission_status(session), config),
            Command::Search { target, term } => self.search(target, &term).await?,

            Command::Show => render_cart(&cart::get_cart(session), config),
            Command::Add { product_id, quantity } => {
                render_cart(&cart::add_to_cart(&self.api, session, &product_id, quantity).await?, config)
            }
            Command::Qty { item_id, quantity } => {
                render_cart(&cart::update_cart_item(session, &item_id, quantity)?, config)
            }
            Command::Remove { item_id } => render_cart(&cart::remove_from_cart(session, &item_id), config),
            Command::Customer(pick) => {
                let customer = select(&self.results.customers, &pick, |c| c.id.as_str(), "Customer")?;
                render_cart(&cart::set_cart_customer(session, customer), config)
            }
            Command::Pay(method) => render_cart(&cart::set_payment_method(session, method), config),
            Command::Discount(amount) => render_cart(&cart::set_discount(session, amount)?, config),
            Command::Tax(amount) => render_cart(&cart::set_manual_tax(session, amount)?, config),
            Command::Totals => render_retail_totals(&cart::get_cart(session).totals, config),
            Command::Submit => match submit::submit_sale(&self.api, session, self.sink.as_ref()).await {
                Ok(_) => String::new(),
                Err(e) => render_issues(&e),
            },
            Command::Clear => render_cart(&cart::clear_cart(session), config),

            Command::WorkOrder(wo) => self.execute_work_order(wo).await?,
        };

        Ok(text.trim_start_matches('\n').to_string())
    }

    async fn execute_work_order(&self, command: WorkOrderCommand) -> Result<String, ApiError> {
        let session = &self.session;
        let results = &self.results;

        let order = match command {
            WorkOrderCommand::Show => work_order::get_work_order(session),
            WorkOrderCommand::Service(pick) => {
                let service = select(&results.services, &pick, |s| s.id.as_str(), "Service")?;
                match service {
                    Some(service) => work_order::add_service(session, &service)?,
                    None => work_order::get_work_order(session),
                }
            }
            WorkOrderCommand::ServiceQty { id, quantity } => work_order::update_service_quantity(session, &id, quantity)?,
            WorkOrderCommand::Notes { id, text } => work_order::set_service_notes(session, &id, &text)?,
            WorkOrderCommand::RemoveService(id) => work_order::remove_service(session, &id),
            WorkOrderCommand::Part(product_id) => work_order::add_part(&self.api, session, &product_id).await?,
            WorkOrderCommand::PartQty { id, quantity } => work_order::update_part_quantity(session, &id, quantity)?,
            WorkOrderCommand::RemovePart(id) => work_order::remove_part(session, &id),
            WorkOrderCommand::Vehicle(pick) => {
                let vehicle = select(&results.vehicles, &pick, |v| v.id.as_str(), "Vehicle")?;
                work_order::set_vehicle(session, vehicle)
            }
            WorkOrderCommand::Technician(pick) => {
                let technician = select(&results.technicians, &pick, |t| t.id.as_str(), "Technician")?;
                work_order::set_technician(session, technician)
            }
            WorkOrderCommand::Customer(pick) => {
                let customer = select(&results.customers, &pick, |c| c.id.as_str(), "Customer")?;
                work_order::set_work_order_customer(session, customer)
            }
            WorkOrderCommand::Intake(date) => work_order::set_intake_date(session, date),
            WorkOrderCommand::Due(date) => work_order::set_due_date(session, date),
            WorkOrderCommand::Odometer(reading) => work_order::set_odometer(session, reading)?,
            WorkOrderCommand::Problem(text) => work_order::set_problem_description(session, &text),
            WorkOrderCommand::Diagnosis(text) => work_order::set_diagnosis(session, text),
            WorkOrderCommand::Submit => {
                return Ok(
                    match submit::submit_work_order(&self.api, session, self.sink.as_ref()).await {
                        Ok(_) => String::new(),
                        Err(e) => render_issues(&e),
                    },
                );
            }
            WorkOrderCommand::Clear => work_order::clear_work_order(session),
        };

        Ok(render_work_order(&order, &self.config))
    }

    async fn search(&mut self, target: Target, term: &str) -> Result<String, ApiError> {
        let money = |m: Money| self.config.format_currency(m);

        let text = match target {
            Target::Products => {
                let rows = lookup::search_products(&self.api, term).await?;
                let text = render_rows(&rows, |p| {
                    format!("{}  {}  {}  {}  (stock {})", p.id, p.sku, p.name, money(p.unit_price), p.available_stock)
                });
                self.results.products = rows;
                text
            }
            Target::Customers => {
                let rows = lookup::search_customers(&self.api, term).await?;
                let text = render_rows(&rows, |c| match &c.phone {
                    Some(phone) => format!("{}  {}  {}", c.id, c.name, phone),
                    None => format!("{}  {}", c.id, c.name),
                });
                self.results.customers = rows;
                text
            }
            Target::Vehicles => {
                let rows = lookup::search_vehicles(&self.api, term).await?;
                let text = render_rows(&rows, |v| format!("{}  {}", v.id, v.label()));
                self.results.vehicles = rows;
                text
            }
            Target::Technicians => {
                let rows = lookup::search_technicians(&self.api, term).await?;
                let text = render_rows(&rows, |t| match &t.specialty {
                    Some(specialty) => format!("{}  {}  ({})", t.id, t.name, specialty),
                    None => format!("{}  {}", t.id, t.name),
                });
                self.results.technicians = rows;
                text
            }
            Target::Services => {
                let rows = lookup::search_services(&self.api, term).await?;
                let text = render_rows(&rows, |s| format!("{}  {}  {}", s.id, s.name, money(s.price)));
                self.results.services = rows;
                text
            }
        };

        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{customer, product, service, Mocks};
    use shopfloor_client::notify::MockNotificationSink;
    use shopfloor_client::{Level, OrderId};

    #[test]
    fn test_parse_add() {
        assert_eq!(
            parse("add p-17").unwrap(),
            Some(Command::Add {
                product_id: "p-17".into(),
                quantity: None
            })
        );
        assert_eq!(
            parse("  ADD p-17 3 ").unwrap(),
            Some(Command::Add {
                product_id: "p-17".into(),
                quantity: Some(3)
            })
        );
        assert_eq!(parse("add").unwrap_err(), ParseError::Usage("add <product-id> [qty]"));
        assert_eq!(parse("add p-1 two").unwrap_err(), ParseError::NotANumber("two".into()));
    }

    #[test]
    fn test_parse_blank_and_unknown() {
        assert_eq!(parse("   ").unwrap(), None);
        assert_eq!(parse("refund 3").unwrap_err(), ParseError::Unknown("refund".into()));
        assert_eq!(parse("wo paint").unwrap_err(), ParseError::Unknown("wo paint".into()));
    }

    #[test]
    fn test_parse_money() {
        assert_eq!(parse("discount 34.20").unwrap(), Some(Command::Discount(Money::from_cents(3420))));
        assert_eq!(parse("tax 17.1").unwrap(), Some(Command::Tax(Some(Money::from_cents(1710)))));
        assert_eq!(parse("tax none").unwrap(), Some(Command::Tax(None)));
        assert!(matches!(parse("discount 1.234"), Err(ParseError::Invalid(_))));
    }

    #[test]
    fn test_parse_payment() {
        assert_eq!(parse("pay card").unwrap(), Some(Command::Pay(Some(PaymentMethod::Card))));
        assert_eq!(parse("pay none").unwrap(), Some(Command::Pay(None)));
        assert!(matches!(parse("pay bitcoin"), Err(ParseError::Invalid(_))));
    }

    #[test]
    fn test_parse_picks() {
        assert_eq!(parse("customer #2").unwrap(), Some(Command::Customer(Pick::Index(2))));
        assert_eq!(parse("customer c-9").unwrap(), Some(Command::Customer(Pick::Id("c-9".into()))));
        assert_eq!(parse("customer none").unwrap(), Some(Command::Customer(Pick::Clear)));
        assert!(parse("customer #0").is_err());
    }

    #[test]
    fn test_parse_search_keeps_full_term() {
        assert_eq!(
            parse("search customers Ana Torres").unwrap(),
            Some(Command::Search {
                target: Target::Customers,
                term: "Ana Torres".into()
            })
        );
        assert_eq!(
            parse("search products").unwrap(),
            Some(Command::Search {
                target: Target::Products,
                term: String::new()
            })
        );
    }

    #[test]
    fn test_parse_work_order() {
        assert_eq!(parse("wo").unwrap(), Some(Command::WorkOrder(WorkOrderCommand::Show)));
        assert_eq!(
            parse("wo intake 2026-03-14").unwrap(),
            Some(Command::WorkOrder(WorkOrderCommand::Intake(NaiveDate::from_ymd_opt(2026, 3, 14))))
        );
        assert!(matches!(
            parse("wo intake today").unwrap(),
            Some(Command::WorkOrder(WorkOrderCommand::Intake(Some(_))))
        ));
        assert_eq!(parse("wo due 14/03/2026").unwrap_err(), ParseError::NotADate("14/03/2026".into()));
        assert_eq!(
            parse("wo odometer 84250").unwrap(),
            Some(Command::WorkOrder(WorkOrderCommand::Odometer(Some(84250))))
        );
        assert_eq!(
            parse("wo notes s-1 check rear pads too").unwrap(),
            Some(Command::WorkOrder(WorkOrderCommand::Notes {
                id: "s-1".into(),
                text: "check rear pads too".into()
            }))
        );
        assert_eq!(
            parse("wo diagnosis none").unwrap(),
            Some(Command::WorkOrder(WorkOrderCommand::Diagnosis(None)))
        );
    }

    fn repl(mocks: Mocks, sink: MockNotificationSink) -> Repl {
        Repl::new(mocks.into_api(), ConfigState::default(), Arc::new(sink))
    }

    #[tokio::test]
    async fn test_quit_and_parse_errors() {
        let mut sink = MockNotificationSink::new();
        sink.expect_notify()
            .once()
            .withf(|n| n.level == Level::Warning && n.message == "Usage: qty <item-id> <qty>")
            .return_const(());
        let mut repl = repl(Mocks::new(), sink);

        assert_eq!(repl.handle_line("quit").await, None);
        assert_eq!(repl.handle_line("").await, Some(String::new()));

        let out = repl.handle_line("qty p-1").await.unwrap();
        assert!(out.is_empty());
    }

    #[tokio::test]
    async fn test_refused_add_reaches_sink() {
        let mut mocks = Mocks::new();
        mocks
            .products
            .expect_get_product()
            .once()
            .returning(|_| Ok(Some(product("p-1", 10000, 5))));

        let mut sink = MockNotificationSink::new();
        sink.expect_notify()
            .once()
            .withf(|n| {
                n.level == Level::Warning
                    && n.title == "Insufficient stock"
                    && n.message.contains("available 5, requested 9")
            })
            .return_const(());

        let mut repl = repl(mocks, sink);
        let out = repl.handle_line("add p-1 9").await.unwrap();

        assert!(out.is_empty());
        assert!(repl.session().with_cart(|c| c.is_empty()));
    }

    #[tokio::test]
    async fn test_search_then_pick_customer() {
        let mut mocks = Mocks::new();
        mocks
            .customers
            .expect_search()
            .once()
            .withf(|term| term == "ana")
            .returning(|_| Ok(vec![customer()]));

        let mut sink = MockNotificationSink::new();
        sink.expect_notify()
            .once()
            .withf(|n| n.title == "Not found")
            .return_const(());
        let mut repl = repl(mocks, sink);

        let out = repl.handle_line("search customers ana").await.unwrap();
        assert_eq!(out, "  1. c-1  Ana Torres");

        let out = repl.handle_line("customer #1").await.unwrap();
        assert!(out.contains("Customer: Ana Torres"));
        assert_eq!(repl.session().with_cart(|c| c.customer().map(|c| c.id.clone())), Some("c-1".into()));

        let out = repl.handle_line("customer c-2").await.unwrap();
        assert!(out.is_empty());
    }

    #[tokio::test]
    async fn test_retail_flow_to_submission() {
        let mut mocks = Mocks::new();
        mocks
            .products
            .expect_get_product()
            .times(2)
            .returning(|_| Ok(Some(product("p-1", 10000, 5))));
        mocks.customers.expect_search().once().returning(|_| Ok(vec![customer()]));
        mocks
            .orders
            .expect_create_sale_order()
            .once()
            .withf(|payload| payload.lines[0].quantity == 2)
            .returning(|_| Ok(OrderId::new("S-900")));

        let mut sink = MockNotificationSink::new();
        sink.expect_notify().once().return_const(());

        let mut repl = repl(mocks, sink);

        let out = repl.handle_line("add p-1 2").await.unwrap();
        assert!(out.contains("Total     $200.00  (2 items)"));

        let out = repl.handle_line("discount 20").await.unwrap();
        assert!(out.contains("Discount  -$20.00"));

        let out = repl.handle_line("tax 17.10").await.unwrap();
        assert!(out.contains("Tax       $17.10 (manual)"));
        assert!(out.contains("Total     $197.10"));

        repl.handle_line("search c").await.unwrap();
        repl.handle_line("customer #1").await.unwrap();

        let out = repl.handle_line("submit").await.unwrap();
        assert!(out.is_empty());
        assert!(repl.session().with_cart(|c| c.is_empty()));

        let out = repl.handle_line("status").await.unwrap();
        assert!(out.starts_with("Sale: created S-900"));
        assert!(out.ends_with("Back office: http://localhost:8000/api"));
    }

    #[tokio::test]
    async fn test_submit_failure_lists_issues() {
        let mut mocks = Mocks::new();
        mocks.orders.expect_create_work_order().never();

        let mut sink = MockNotificationSink::new();
        sink.expect_notify().once().return_const(());

        let mut repl = repl(mocks, sink);
        let out = repl.handle_line("wo submit").await.unwrap();

        assert!(out.contains("  - Select a vehicle"));
        assert!(out.contains("  - Add at least one service or part"));
    }

    #[tokio::test]
    async fn test_work_order_service_from_search() {
        let mut mocks = Mocks::new();
        mocks
            .services
            .expect_search()
            .once()
            .returning(|_| Ok(vec![service("s-1", 4500)]));

        let mut repl = repl(mocks, MockNotificationSink::new());

        repl.handle_line("search services oil").await.unwrap();
        let out = repl.handle_line("wo service s-1").await.unwrap();
        assert!(out.contains("service s-1  Service s-1  x1 @ $45.00"));
        assert!(out.contains("Tax 16%   $7.20"));
        assert!(out.contains("Total     $52.20"));
    }
}
