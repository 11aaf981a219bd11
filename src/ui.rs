// UI layer: the numbered menu loop and one handler per menu entry.
// Handlers gather fields line by line, build an `Order` when needed and
// hand the request to `ApiClient`; the response goes through `render`.

use crate::api::{ApiClient, Order};
use crate::error::{FieldError, RequestError, SessionError};
use crate::input::{LineSource, ReaderLines, TermLines};
use crate::render;
use anyhow::Result;
use indicatif::{ProgressBar, ProgressStyle};
use reqwest::blocking::Response;
use std::io::{self, IsTerminal, Write};
use tracing::{debug, info};

const ORDERS_PATH: &str = "/api/orders";

/// One entry of the main menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    Health,
    Ready,
    CreateOrder,
    ListOrders,
    GetOrder,
    UpdateOrder,
    DeleteOrder,
    Exit,
}

impl MenuChoice {
    /// Exact match on `"1"`..`"8"`; anything else is not a choice.
    pub fn parse(input: &str) -> Option<Self> {
        let choice = match input {
            "1" => MenuChoice::Health,
            "2" => MenuChoice::Ready,
            "3" => MenuChoice::CreateOrder,
            "4" => MenuChoice::ListOrders,
            "5" => MenuChoice::GetOrder,
            "6" => MenuChoice::UpdateOrder,
            "7" => MenuChoice::DeleteOrder,
            "8" => MenuChoice::Exit,
            _ => return None,
        };
        Some(choice)
    }
}

/// Parse a quantity the way the user typed it (optional sign, digits).
pub fn parse_quantity(text: &str) -> Result<i64, FieldError> {
    text.parse().map_err(|_| FieldError::Quantity)
}

pub fn parse_amount(text: &str) -> Result<f64, FieldError> {
    text.parse().map_err(|_| FieldError::Amount)
}

/// Run the interactive menu on stdin/stdout until the user exits or input
/// ends. A terminal gets dialoguer prompts; piped input is read line by line.
pub fn main_menu(api: ApiClient) -> Result<()> {
    info!(base_url = %api.base_url(), "starting order client");
    if io::stdin().is_terminal() && io::stdout().is_terminal() {
        Session::new(api, TermLines::new(), io::stdout()).run()?;
    } else {
        let input = ReaderLines::new(io::stdin().lock(), io::stdout());
        Session::new(api, input, io::stdout()).run()?;
    }
    Ok(())
}

/// The menu loop bound to an API client, an input source and an output sink.
pub struct Session<S, W> {
    api: ApiClient,
    input: S,
    out: W,
}

impl<S: LineSource, W: Write> Session<S, W> {
    pub fn new(api: ApiClient, input: S, out: W) -> Self {
        Session { api, input, out }
    }

    /// Give back the output sink, e.g. to inspect what was printed.
    pub fn into_output(self) -> W {
        self.out
    }

    /// Loop until "8" is chosen or the input closes. Only console I/O
    /// errors escape; request failures are printed and the loop goes on.
    pub fn run(&mut self) -> Result<(), SessionError> {
        match self.run_loop() {
            Err(SessionError::InputClosed) => {
                debug!("input closed, leaving menu");
                Ok(())
            }
            other => other,
        }
    }

    fn run_loop(&mut self) -> Result<(), SessionError> {
        loop {
            self.print_menu()?;
            let line = self.ask("Select an option (1-8)")?;
            match MenuChoice::parse(&line) {
                Some(MenuChoice::Exit) => {
                    writeln!(self.out, "Exiting...")?;
                    return Ok(());
                }
                Some(choice) => self.handle(choice)?,
                None => writeln!(self.out, "Invalid choice, please try again.")?,
            }

            writeln!(self.out)?;
            self.ask("Press Enter to continue")?;
        }
    }

    fn handle(&mut self, choice: MenuChoice) -> Result<(), SessionError> {
        debug!(?choice, "menu choice");
        match choice {
            MenuChoice::Health => self.check_health(),
            MenuChoice::Ready => self.check_ready(),
            MenuChoice::CreateOrder => self.create_order(),
            MenuChoice::ListOrders => self.list_orders(),
            MenuChoice::GetOrder => self.get_order(),
            MenuChoice::UpdateOrder => self.update_order(),
            MenuChoice::DeleteOrder => self.delete_order(),
            MenuChoice::Exit => Ok(()),
        }
    }

    fn print_menu(&mut self) -> io::Result<()> {
        writeln!(self.out, "======== Order Service Client ========")?;
        writeln!(self.out, "1. Health check")?;
        writeln!(self.out, "2. Readiness check")?;
        writeln!(self.out, "3. Create order")?;
        writeln!(self.out, "4. List all orders")?;
        writeln!(self.out, "5. Get order by ID")?;
        writeln!(self.out, "6. Update order")?;
        writeln!(self.out, "7. Delete order")?;
        writeln!(self.out, "8. Exit")
    }

    fn title(&mut self, title: &str) -> io::Result<()> {
        writeln!(self.out, "=== {} ===", title)
    }

    /// Read one trimmed line, treating end of input as the end of the session.
    fn ask(&mut self, prompt: &str) -> Result<String, SessionError> {
        self.out.flush()?;
        self.input
            .read_line(prompt)?
            .ok_or(SessionError::InputClosed)
    }

    /// Read and parse a numeric field. A parse failure is printed and
    /// yields `None` so the caller can abort the action.
    fn ask_number<T, F>(&mut self, prompt: &str, parse: F) -> Result<Option<T>, SessionError>
    where
        F: Fn(&str) -> Result<T, FieldError>,
    {
        let text = self.ask(prompt)?;
        match parse(&text) {
            Ok(value) => Ok(Some(value)),
            Err(err) => {
                debug!(field = prompt, input = %text, "rejected numeric input");
                writeln!(self.out, "{}", err)?;
                Ok(None)
            }
        }
    }

    /// Product ID, quantity and amount, in that order.
    fn ask_order_fields(&mut self) -> Result<Option<Order>, SessionError> {
        let product_id = self.ask("Product ID")?;
        let Some(quantity) = self.ask_number("Quantity", parse_quantity)? else {
            return Ok(None);
        };
        let Some(amount) = self.ask_number("Amount", parse_amount)? else {
            return Ok(None);
        };
        Ok(Some(Order::new(product_id, quantity, amount)))
    }

    fn check_health(&mut self) -> Result<(), SessionError> {
        self.title("Health check")?;
        self.send(|api| api.get("/health"))
    }

    fn check_ready(&mut self) -> Result<(), SessionError> {
        self.title("Readiness check")?;
        self.send(|api| api.get("/ready"))
    }

    fn create_order(&mut self) -> Result<(), SessionError> {
        self.title("Create order")?;
        let Some(order) = self.ask_order_fields()? else {
            return Ok(());
        };
        self.send(|api| api.post(ORDERS_PATH, &order))
    }

    fn list_orders(&mut self) -> Result<(), SessionError> {
        self.title("All orders")?;
        self.send(|api| api.get(ORDERS_PATH))
    }

    fn get_order(&mut self) -> Result<(), SessionError> {
        self.title("Get order by ID")?;
        let id = self.ask("Order ID")?;
        self.send(|api| api.get(&order_path(&id)))
    }

    fn update_order(&mut self) -> Result<(), SessionError> {
        self.title("Update order")?;
        let id = self.ask("Order ID")?;
        let Some(order) = self.ask_order_fields()? else {
            return Ok(());
        };
        let status = self.ask("Status")?;
        let order = order.with_status(status);
        self.send(|api| api.put(&order_path(&id), &order))
    }

    fn delete_order(&mut self) -> Result<(), SessionError> {
        self.title("Delete order")?;
        let id = self.ask("Order ID")?;
        self.send(|api| api.delete(&order_path(&id)))
    }

    /// Run one request helper and render the outcome. Request failures
    /// are printed, never returned.
    fn send<F>(&mut self, call: F) -> Result<(), SessionError>
    where
        F: FnOnce(&ApiClient) -> Result<Response, RequestError>,
    {
        let spinner = spinner("Waiting for order service...");
        let res = call(&self.api);
        spinner.finish_and_clear();

        match res {
            Ok(res) => render::response(&mut self.out, res)?,
            Err(err) => writeln!(self.out, "{}", err)?,
        }
        Ok(())
    }
}

// The id is spliced in as typed; no escaping.
fn order_path(id: &str) -> String {
    format!("{}/{}", ORDERS_PATH, id)
}

/// Spinner on stderr while a request is in flight, drawn once since nothing
/// else runs during the blocking call. indicatif hides it when stderr is not
/// a terminal.
fn spinner(msg: &str) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner} {msg}") {
        spinner.set_style(style);
    }
    spinner.set_message(msg.to_string());
    spinner.tick();
    spinner
}
