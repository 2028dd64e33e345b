//! # Operator Console
//!
//! Line-based front-end: login prompt, command menu and field-by-field
//! forms over any async reader and writer.
//!
//! ## Session Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  Username / Password ◄──────────── denied: message, ask again          │
//! │       │ ok                                    ▲                         │
//! │       ▼                                       │                         │
//! │  Welcome, operator1                           │ logout                  │
//! │       │                                       │                         │
//! │       ▼                                       │                         │
//! │  > receive | sell | product ──► form ──► save ┤                         │
//! │  > receipts | sales | products ──► list ──────┤                         │
//! │  > quit / end of input ──► exit               │                         │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Form Handling
//! Every field is prompted once. If validation rejects the form only the
//! named field is asked again; the other answers are kept. A storage
//! failure on save is reported and the submission dropped. End of input
//! anywhere ends the session.

use tokio::io::{self, AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tracing::{debug, warn};

use crate::commands::auth::{self, OperatorSession};
use crate::commands::{product, receiving, sales};
use crate::error::ApiError;
use crate::state::{AppConfig, DbState};
use stockroom_core::forms::{FormField, FormInput, GoodsReceiptForm, ProductForm, SaleForm};
use stockroom_core::validation::ValidationResult;
use stockroom_core::{Money, TaxRate, UnitOfMeasure};

const BANNER: &str = "Stockroom inventory";

const MENU: &str = "\
Commands:
  receive   record goods received from a supplier
  sell      record a sale to a customer
  product   add a product to the master list
  receipts  list goods received
  sales     list sales
  products  list the product master
  help      show this list
  logout    switch operator
  quit      exit";

/// Fields that take a unit of measurement.
const UNIT_FIELDS: [&str; 2] = ["unit", "default_unit"];

/// Field whose value selects product defaults.
const PRODUCT_NAME_FIELD: &str = "product_name";

/// Answers used when the operator leaves a field blank.
type Defaults = Vec<(&'static str, String)>;

/// Which master-list values a form takes once its product is known.
#[derive(Debug, Clone, Copy)]
struct Prefill {
    /// Form field that receives the product's price.
    price_field: &'static str,
}

/// What happened to a form.
enum Filled<T> {
    Valid(T),
    Abandoned,
    EndOfInput,
}

/// Result of one menu command.
enum Flow {
    Continue,
    EndOfInput,
}

/// How a logged-in session ended.
enum SessionEnd {
    Logout,
    Quit,
}

/// The interactive console.
///
/// ## Usage
/// ```rust,ignore
/// let stdin = BufReader::new(tokio::io::stdin());
/// let mut console = Console::new(&db, &config, stdin, tokio::io::stdout());
/// console.run().await?;
/// ```
pub struct Console<'a, R, W> {
    db: &'a DbState,
    config: &'a AppConfig,
    input: R,
    output: W,
}

impl<'a, R, W> Console<'a, R, W>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    pub fn new(db: &'a DbState, config: &'a AppConfig, input: R, output: W) -> Self {
        Console {
            db,
            config,
            input,
            output,
        }
    }

    /// Gives back the writer (tests read the transcript from it).
    pub fn into_output(self) -> W {
        self.output
    }

    /// Runs login and command sessions until `quit` or end of input.
    ///
    /// Only I/O failures on the reader or writer are returned; every
    /// command error is shown to the operator instead.
    pub async fn run(&mut self) -> io::Result<()> {
        self.say(BANNER).await?;

        loop {
            let Some(session) = self.login().await? else {
                break;
            };

            match self.session(&session).await? {
                SessionEnd::Logout => {
                    self.say(&format!("Goodbye, {}", session.username)).await?;
                }
                SessionEnd::Quit => break,
            }
        }

        self.output.flush().await
    }

    // =========================================================================
    // Login
    // =========================================================================

    async fn login(&mut self) -> io::Result<Option<OperatorSession>> {
        loop {
            let Some(username) = self.prompt("Username").await? else {
                return Ok(None);
            };
            let Some(password) = self.prompt("Password").await? else {
                return Ok(None);
            };

            match auth::login(self.db, username.trim(), password.trim()).await {
                Ok(session) => {
                    self.say(&format!("Welcome, {}", session.username)).await?;
                    self.say(MENU).await?;
                    return Ok(Some(session));
                }
                Err(err) => self.say(&err.message).await?,
            }
        }
    }

    // =========================================================================
    // Command Menu
    // =========================================================================

    async fn session(&mut self, session: &OperatorSession) -> io::Result<SessionEnd> {
        loop {
            let Some(line) = self.ask("> ").await? else {
                return Ok(SessionEnd::Quit);
            };
            let command = line.trim().to_ascii_lowercase();
            debug!(operator = %session.username, command = %command, "Console command");

            let flow = match command.as_str() {
                "" => Flow::Continue,
                "receive" => self.receive().await?,
                "sell" => self.sell().await?,
                "product" => self.add_product().await?,
                "receipts" => self.show_receipts().await?,
                "sales" => self.show_sales().await?,
                "products" => self.show_products().await?,
                "help" => {
                    self.say(MENU).await?;
                    Flow::Continue
                }
                "logout" => return Ok(SessionEnd::Logout),
                "quit" | "exit" => return Ok(SessionEnd::Quit),
                other => {
                    self.say(&format!("Unknown command '{}'. Type 'help' for the list.", other))
                        .await?;
                    Flow::Continue
                }
            };

            if let Flow::EndOfInput = flow {
                return Ok(SessionEnd::Quit);
            }
        }
    }

    // =========================================================================
    // Entry Forms
    // =========================================================================

    async fn receive(&mut self) -> io::Result<Flow> {
        self.say("-- Goods Receiving --").await?;
        self.show_known_products().await?;

        let mut form = GoodsReceiptForm::default();
        let mut defaults = vec![("unit", UnitOfMeasure::default().as_str().to_string())];
        let prefill = Prefill {
            price_field: "unit_cost",
        };

        let receipt = match self
            .complete(&mut form, &mut defaults, Some(prefill), GoodsReceiptForm::validate)
            .await?
        {
            Filled::Valid(receipt) => receipt,
            Filled::Abandoned => return Ok(Flow::Continue),
            Filled::EndOfInput => return Ok(Flow::EndOfInput),
        };

        self.say(&format!("Total rate: {}", receipt.total())).await?;
        match self.confirm().await? {
            Some(true) => {}
            Some(false) => return Ok(Flow::Continue),
            None => return Ok(Flow::EndOfInput),
        }

        match receiving::record_goods_receipt(self.db, &form).await {
            Ok(recorded) => {
                self.say(&format!(
                    "Goods receiving data saved successfully. (record #{})",
                    recorded.id
                ))
                .await?
            }
            Err(err) => self.report_failure(&err).await?,
        }

        Ok(Flow::Continue)
    }

    async fn sell(&mut self) -> io::Result<Flow> {
        self.say("-- Sales --").await?;
        self.show_known_products().await?;

        let mut form = SaleForm::default();
        let mut defaults = vec![("unit", UnitOfMeasure::default().as_str().to_string())];
        let prefill = Prefill {
            price_field: "unit_price",
        };

        let sale = match self
            .complete(&mut form, &mut defaults, Some(prefill), SaleForm::validate)
            .await?
        {
            Filled::Valid(sale) => sale,
            Filled::Abandoned => return Ok(Flow::Continue),
            Filled::EndOfInput => return Ok(Flow::EndOfInput),
        };

        self.say(&format!("Total rate: {}", sale.total())).await?;
        match self.confirm().await? {
            Some(true) => {}
            Some(false) => return Ok(Flow::Continue),
            None => return Ok(Flow::EndOfInput),
        }

        match sales::record_sale(self.db, &form).await {
            Ok(recorded) => {
                self.say(&format!(
                    "Sales data saved successfully. (record #{})",
                    recorded.id
                ))
                .await?
            }
            Err(err) => self.report_failure(&err).await?,
        }

        Ok(Flow::Continue)
    }

    async fn add_product(&mut self) -> io::Result<Flow> {
        self.say("-- Product Master --").await?;

        let mut form = ProductForm::default();
        let mut defaults = vec![(
            "default_unit",
            UnitOfMeasure::default().as_str().to_string(),
        )];

        let entry = match self
            .complete(&mut form, &mut defaults, None, ProductForm::validate)
            .await?
        {
            Filled::Valid(entry) => entry,
            Filled::Abandoned => return Ok(Flow::Continue),
            Filled::EndOfInput => return Ok(Flow::EndOfInput),
        };

        self.say(&format!(
            "{} [{}] at {} + {} tax, sold in {}",
            entry.name, entry.sku, entry.unit_price, entry.tax_rate, entry.default_unit
        ))
        .await?;
        match self.confirm().await? {
            Some(true) => {}
            Some(false) => return Ok(Flow::Continue),
            None => return Ok(Flow::EndOfInput),
        }

        match product::add_product(self.db, self.config, &form).await {
            Ok(id) => {
                self.say(&format!(
                    "Product master data saved successfully. (record #{})",
                    id
                ))
                .await?
            }
            Err(err) => self.report_failure(&err).await?,
        }

        Ok(Flow::Continue)
    }

    /// Prompts every field, then re-prompts rejected fields until the
    /// form validates.
    async fn complete<F, T>(
        &mut self,
        form: &mut F,
        defaults: &mut Defaults,
        prefill: Option<Prefill>,
        validate: fn(&F) -> ValidationResult<T>,
    ) -> io::Result<Filled<T>>
    where
        F: FormInput,
    {
        for field in F::fields() {
            if !self.prompt_field(form, *field, defaults, prefill).await? {
                return Ok(Filled::EndOfInput);
            }
        }

        loop {
            let err = match validate(form) {
                Ok(valid) => return Ok(Filled::Valid(valid)),
                Err(err) => ApiError::from(err),
            };

            self.say(&format!("Invalid input: {}", err.message)).await?;

            let field = err
                .field
                .as_deref()
                .and_then(|name| F::fields().iter().find(|f| f.name == name))
                .copied();
            let Some(field) = field else {
                warn!(field = ?err.field, "Rejected field is not on the form");
                return Ok(Filled::Abandoned);
            };

            if !self.prompt_field(form, field, defaults, prefill).await? {
                return Ok(Filled::EndOfInput);
            }
        }
    }

    /// Prompts one field and stores the answer; `false` at end of input.
    async fn prompt_field<F: FormInput>(
        &mut self,
        form: &mut F,
        field: FormField,
        defaults: &mut Defaults,
        prefill: Option<Prefill>,
    ) -> io::Result<bool> {
        let default = defaults
            .iter()
            .find(|(name, _)| *name == field.name)
            .map(|(_, value)| value.clone());

        let mut label = field.label.to_string();
        if UNIT_FIELDS.contains(&field.name) {
            label = format!("{} ({})", label, UnitOfMeasure::names().join(", "));
        }
        if let Some(default) = &default {
            label = format!("{} [{}]", label, default);
        }

        let Some(mut answer) = self.prompt(&label).await? else {
            return Ok(false);
        };
        if answer.trim().is_empty() {
            if let Some(default) = default {
                answer = default;
            }
        }

        if let Some(slot) = form.field_mut(field.name) {
            *slot = answer.clone();
        }

        if let Some(prefill) = prefill {
            if field.name == PRODUCT_NAME_FIELD {
                self.offer_defaults(&answer, prefill, defaults).await;
            }
        }

        Ok(true)
    }

    /// Loads master-list defaults for the named product, if it is listed.
    async fn offer_defaults(&mut self, name: &str, prefill: Prefill, defaults: &mut Defaults) {
        match product::product_defaults(self.db, name).await {
            Ok(Some(found)) => {
                set_default(defaults, "unit", found.unit.as_str().to_string());
                set_default(defaults, "tax_percent", found.tax_input());
                set_default(defaults, prefill.price_field, found.price_input());
            }
            Ok(None) => {}
            Err(err) => warn!(error = %err, "Product defaults unavailable"),
        }
    }

    /// Asks for confirmation; blank means yes. `None` at end of input.
    async fn confirm(&mut self) -> io::Result<Option<bool>> {
        let Some(answer) = self.prompt("Save? [Y/n]").await? else {
            return Ok(None);
        };

        let save = !matches!(answer.trim().to_ascii_lowercase().as_str(), "n" | "no");
        if !save {
            self.say("Discarded.").await?;
        }
        Ok(Some(save))
    }

    async fn report_failure(&mut self, err: &ApiError) -> io::Result<()> {
        self.say(&format!("Could not save: {}", err.message)).await
    }

    // =========================================================================
    // Listings
    // =========================================================================

    async fn show_known_products(&mut self) -> io::Result<()> {
        match product::product_names(self.db).await {
            Ok(names) if !names.is_empty() => {
                self.say(&format!("Known products: {}", names.join(", "))).await
            }
            Ok(_) => Ok(()),
            Err(err) => {
                warn!(error = %err, "Product names unavailable");
                Ok(())
            }
        }
    }

    async fn show_receipts(&mut self) -> io::Result<Flow> {
        let receipts = match receiving::list_goods_receipts(self.db).await {
            Ok(receipts) => receipts,
            Err(err) => {
                self.say(&err.message).await?;
                return Ok(Flow::Continue);
            }
        };

        if receipts.is_empty() {
            self.say("No goods receipts recorded.").await?;
        }
        for r in receipts {
            self.say(&format!(
                "#{} {} {} -> {}: {} {} @ {} + {} = {}",
                r.id,
                r.received_at.format("%Y-%m-%d %H:%M"),
                r.supplier_name,
                r.product_name,
                r.quantity,
                r.unit,
                Money::from_cents(r.unit_cost_cents),
                TaxRate::from_bps(r.tax_rate_bps),
                Money::from_cents(r.total_cents),
            ))
            .await?;
        }

        Ok(Flow::Continue)
    }

    async fn show_sales(&mut self) -> io::Result<Flow> {
        let sales = match sales::list_sales(self.db).await {
            Ok(sales) => sales,
            Err(err) => {
                self.say(&err.message).await?;
                return Ok(Flow::Continue);
            }
        };

        if sales.is_empty() {
            self.say("No sales recorded.").await?;
        }
        for s in sales {
            self.say(&format!(
                "#{} {} {} -> {}: {} {} @ {} + {} = {}",
                s.id,
                s.sold_at.format("%Y-%m-%d %H:%M"),
                s.product_name,
                s.customer_name,
                s.quantity,
                s.unit,
                Money::from_cents(s.unit_price_cents),
                TaxRate::from_bps(s.tax_rate_bps),
                Money::from_cents(s.total_cents),
            ))
            .await?;
        }

        Ok(Flow::Continue)
    }

    async fn show_products(&mut self) -> io::Result<Flow> {
        let products = match product::list_products(self.db).await {
            Ok(products) => products,
            Err(err) => {
                self.say(&err.message).await?;
                return Ok(Flow::Continue);
            }
        };

        if products.is_empty() {
            self.say("No products in the master list.").await?;
        }
        for p in products {
            let mut line = format!(
                "#{} {} [{}] barcode {}, {}/{}, {} + {}, per {}",
                p.id,
                p.name,
                p.sku,
                p.barcode,
                p.category,
                p.subcategory,
                Money::from_cents(p.unit_price_cents),
                TaxRate::from_bps(p.tax_rate_bps),
                p.default_unit,
            );
            if let Some(description) = &p.description {
                line.push_str(&format!(" - {}", description));
            }
            if let Some(image) = &p.image_path {
                line.push_str(&format!(" (image: {})", image));
            }
            self.say(&line).await?;
        }

        Ok(Flow::Continue)
    }

    // =========================================================================
    // Line I/O
    // =========================================================================

    async fn say(&mut self, text: &str) -> io::Result<()> {
        self.output.write_all(text.as_bytes()).await?;
        self.output.write_all(b"\n").await
    }

    async fn prompt(&mut self, label: &str) -> io::Result<Option<String>> {
        self.ask(&format!("{}: ", label)).await
    }

    /// Writes `prompt` and reads one line without its terminator.
    async fn ask(&mut self, prompt: &str) -> io::Result<Option<String>> {
        self.output.write_all(prompt.as_bytes()).await?;
        self.output.flush().await?;

        let mut line = String::new();
        if self.input.read_line(&mut line).await? == 0 {
            return Ok(None);
        }

        let len = line.trim_end_matches(['\n', '\r']).len();
        line.truncate(len);
        Ok(Some(line))
    }
}

fn set_default(defaults: &mut Defaults, field: &'static str, value: String) {
    match defaults.iter_mut().find(|(name, _)| *name == field) {
        Some(slot) => slot.1 = value,
        None => defaults.push((field, value)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stockroom_core::forms::ProductForm;

    const LOGIN: &str = "operator1\npassword123\n";

    async fn run_script(db: &DbState, script: &str) -> String {
        let config = AppConfig::default();
        let mut console = Console::new(db, &config, script.as_bytes(), Vec::new());
        console.run().await.unwrap();
        String::from_utf8(console.into_output()).unwrap()
    }

    #[tokio::test]
    async fn test_denied_login_asks_again() {
        let db = DbState::in_memory().await.unwrap();

        let out = run_script(&db, "operator1\nwrong\noperator1\npassword123\nquit\n").await;

        assert!(out.contains("Invalid username or password."));
        assert!(out.contains("Welcome, operator1"));
        assert_eq!(out.matches("Username: ").count(), 2);
    }

    #[tokio::test]
    async fn test_end_of_input_at_login_exits() {
        let db = DbState::in_memory().await.unwrap();

        let out = run_script(&db, "").await;

        assert!(out.starts_with(BANNER));
        assert!(!out.contains("Welcome"));
    }

    #[tokio::test]
    async fn test_receive_goods_shows_total_and_saves() {
        let db = DbState::in_memory().await.unwrap();
        let script = format!("{LOGIN}receive\nAcme\nWidget\n10\n\n2.50\n\n\nquit\n");

        let out = run_script(&db, &script).await;

        assert!(out.contains("Total rate: $25.00"));
        assert!(out.contains("Goods receiving data saved successfully."));
        let receipts = receiving::list_goods_receipts(&db).await.unwrap();
        assert_eq!(receipts.len(), 1);
        assert_eq!(receipts[0].supplier_name, "Acme");
        assert_eq!(receipts[0].unit, UnitOfMeasure::Pcs);
        assert_eq!(receipts[0].total_cents, 2500);
    }

    #[tokio::test]
    async fn test_invalid_field_is_the_only_one_asked_again() {
        let db = DbState::in_memory().await.unwrap();
        let script = format!("{LOGIN}receive\nAcme\nWidget\n0\npcs\n2.50\n\n5\ny\nquit\n");

        let out = run_script(&db, &script).await;

        assert!(out.contains("Invalid input: quantity must be positive"));
        assert_eq!(out.matches("Supplier name: ").count(), 1);
        assert_eq!(out.matches("Quantity: ").count(), 2);

        let receipts = receiving::list_goods_receipts(&db).await.unwrap();
        assert_eq!(receipts.len(), 1);
        assert_eq!(receipts[0].supplier_name, "Acme");
        assert_eq!(receipts[0].quantity, 5);
    }

    #[tokio::test]
    async fn test_sale_prefills_from_product_master() {
        let db = DbState::in_memory().await.unwrap();
        let widget = ProductForm {
            barcode: "123".to_string(),
            sku: "W-1".to_string(),
            category: "Hardware".to_string(),
            subcategory: "Fasteners".to_string(),
            name: "Widget".to_string(),
            unit_price: "9.99".to_string(),
            tax_percent: "8.25".to_string(),
            default_unit: "boxes".to_string(),
            ..ProductForm::default()
        };
        product::add_product(&db, &AppConfig::default(), &widget)
            .await
            .unwrap();

        // customer, product, quantity, then accept unit, price and tax defaults
        let script = format!("{LOGIN}sell\nJane\nWidget\n2\n\n\n\n\nquit\n");
        let out = run_script(&db, &script).await;

        assert!(out.contains("Known products: Widget"));
        assert!(out.contains("[9.99]"));
        // 2 × $9.99 = $19.98, + 8.25% ($1.65)
        assert!(out.contains("Total rate: $21.63"));

        let sales = sales::list_sales(&db).await.unwrap();
        assert_eq!(sales.len(), 1);
        assert_eq!(sales[0].unit, UnitOfMeasure::Boxes);
        assert_eq!(sales[0].unit_price_cents, 999);
        assert_eq!(sales[0].tax_rate_bps, 825);
    }

    #[tokio::test]
    async fn test_declined_save_writes_nothing() {
        let db = DbState::in_memory().await.unwrap();
        let script = format!("{LOGIN}sell\nJane\nRice\n1\nkg\n3\n\nn\nquit\n");

        let out = run_script(&db, &script).await;

        assert!(out.contains("Discarded."));
        assert!(sales::list_sales(&db).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_storage_failure_drops_submission_and_continues() {
        let db = DbState::in_memory().await.unwrap();
        sqlx_drop_sales(&db).await;
        let script = format!("{LOGIN}sell\nJane\nRice\n1\nkg\n3\n\n\nproducts\nquit\n");

        let out = run_script(&db, &script).await;

        assert!(out.contains("Could not save: Failed to save or load data"));
        assert!(out.contains("No products in the master list."));
    }

    #[tokio::test]
    async fn test_product_form_and_listing() {
        let db = DbState::in_memory().await.unwrap();
        let script = format!(
            "{LOGIN}product\n123\nW-1\nHardware\nFasteners\nWidget\n\n9.99\n5\n\nwidget.png\n\nproducts\nquit\n"
        );

        let out = run_script(&db, &script).await;

        assert!(out.contains("Product master data saved successfully."));
        assert!(out.contains("Widget [W-1] barcode 123, Hardware/Fasteners, $9.99 + 5.00%, per pcs"));
        assert!(out.contains("widget.png"));
    }

    #[tokio::test]
    async fn test_listings_when_empty_and_after_receipt() {
        let db = DbState::in_memory().await.unwrap();
        let script = format!("{LOGIN}receipts\nsales\nreceive\nAcme\nWidget\n10\n\n2.50\n\n\nreceipts\nquit\n");

        let out = run_script(&db, &script).await;

        assert!(out.contains("No goods receipts recorded."));
        assert!(out.contains("No sales recorded."));
        assert!(out.contains("Acme -> Widget: 10 pcs @ $2.50 + 0.00% = $25.00"));
    }

    #[tokio::test]
    async fn test_logout_returns_to_login() {
        let db = DbState::in_memory().await.unwrap();

        let out = run_script(&db, &format!("{LOGIN}logout\noperator2\npassword123\nquit\n")).await;

        assert!(out.contains("Goodbye, operator1"));
        assert!(out.contains("Welcome, operator2"));
    }

    #[tokio::test]
    async fn test_unknown_command_and_end_of_input_in_form() {
        let db = DbState::in_memory().await.unwrap();

        let out = run_script(&db, &format!("{LOGIN}dance\nreceive\nAcme\n")).await;

        assert!(out.contains("Unknown command 'dance'"));
        assert!(out.ends_with("Product name: "));
        assert!(receiving::list_goods_receipts(&db).await.unwrap().is_empty());
    }

    async fn sqlx_drop_sales(db: &DbState) {
        sqlx::query("DROP TABLE sales")
            .execute(db.inner().pool())
            .await
            .unwrap();
    }
}
