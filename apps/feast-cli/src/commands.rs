//! Line parsing for the interactive shell.

use feast::contract::model::{Language, OrderStatus, UserStatus};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellCommand {
    Help,
    Quit,
    Lang(Language),
    Menu,
    Add { dish: String, quantity: u32 },
    Remove(String),
    Quantity { id: String, quantity: u32 },
    Inc(String),
    Dec(String),
    Cart,
    ClearCart,
    Checkout,
    Reserve,
    Login(Option<String>),
    Logout,
    Dishes { search: String },
    DishAdd,
    DishEdit(String),
    DishToggle(String),
    DishDelete(String),
    Orders { search: String },
    OrdersFilter(Option<OrderStatus>),
    SetOrderStatus { id: String, status: OrderStatus },
    OrderDelete(String),
    Users { search: String },
    SetUserStatus { id: String, status: UserStatus },
    UserDelete(String),
    Dashboard,
}

pub const HELP: &str = "\
Storefront
  menu                         show the menu
  lang <en|ar|fr>              switch language
  add <dish> [qty]             put a dish in the cart (id or name)
  remove <id> | qty <id> <n>   drop a line or set its quantity
  inc <id> | dec <id>          one more / one less
  cart | clear                 show or empty the cart
  checkout                     place a cash-on-delivery order
  reserve                      book a table
Admin
  login [password] | logout
  dishes [search]              list dishes
  dish add | dish edit <id> | dish toggle <id> | dish delete <id>
  orders [search]              list orders
  filter <status|all>          filter orders by status
  order status <id> <status> | order delete <id>
  users [search]               list users with stats
  user status <id> <status> | user delete <id>
  dashboard                    overview figures
Other
  help | quit";

/// Split a line into words. Single or double quotes group words; quotes are removed.
pub fn tokenize(line: &str) -> Result<Vec<String>, String> {
    let mut words = Vec::new();
    let mut current = String::new();
    let mut in_word = false;
    let mut quote: Option<char> = None;

    for c in line.chars() {
        match quote {
            Some(q) if c == q => quote = None,
            Some(_) => current.push(c),
            None if c == '"' || c == '\'' => {
                quote = Some(c);
                in_word = true;
            }
            None if c.is_whitespace() => {
                if in_word {
                    words.push(std::mem::take(&mut current));
                    in_word = false;
                }
            }
            None => {
                current.push(c);
                in_word = true;
            }
        }
    }
    if let Some(q) = quote {
        return Err(format!("unterminated {q} quote"));
    }
    if in_word {
        words.push(current);
    }
    Ok(words)
}

fn parse_quantity(raw: &str) -> Result<u32, String> {
    raw.parse()
        .map_err(|_| format!("'{raw}' is not a valid quantity"))
}

fn one(args: &[String], usage: &str) -> Result<String, String> {
    match args {
        [only] => Ok(only.clone()),
        _ => Err(format!("usage: {usage}")),
    }
}

/// Parse one shell line. `Ok(None)` for blank lines.
pub fn parse(line: &str) -> Result<Option<ShellCommand>, String> {
    let words = tokenize(line)?;
    let Some((head, args)) = words.split_first() else {
        return Ok(None);
    };

    let cmd = match (head.to_lowercase().as_str(), args) {
        ("help" | "?", _) => ShellCommand::Help,
        ("quit" | "exit" | "q", _) => ShellCommand::Quit,
        ("lang", [code]) => ShellCommand::Lang(code.parse()?),
        ("lang", _) => return Err("usage: lang <en|ar|fr>".into()),
        ("menu", _) => ShellCommand::Menu,
        ("add", [dish]) => ShellCommand::Add {
            dish: dish.clone(),
            quantity: 1,
        },
        ("add", [dish, qty]) => ShellCommand::Add {
            dish: dish.clone(),
            quantity: parse_quantity(qty)?,
        },
        ("add", _) => return Err("usage: add <dish> [qty]".into()),
        ("remove" | "rm", _) => ShellCommand::Remove(one(args, "remove <id>")?),
        ("qty", [id, qty]) => ShellCommand::Quantity {
            id: id.clone(),
            quantity: parse_quantity(qty)?,
        },
        ("qty", _) => return Err("usage: qty <id> <n>".into()),
        ("inc", _) => ShellCommand::Inc(one(args, "inc <id>")?),
        ("dec", _) => ShellCommand::Dec(one(args, "dec <id>")?),
        ("cart", _) => ShellCommand::Cart,
        ("clear", _) => ShellCommand::ClearCart,
        ("checkout", _) => ShellCommand::Checkout,
        ("reserve", _) => ShellCommand::Reserve,
        ("login", []) => ShellCommand::Login(None),
        ("login", [password]) => ShellCommand::Login(Some(password.clone())),
        ("login", _) => return Err("usage: login [password]".into()),
        ("logout", _) => ShellCommand::Logout,
        ("dishes", _) => ShellCommand::Dishes {
            search: args.join(" "),
        },
        ("dish", [sub, rest @ ..]) => match (sub.as_str(), rest) {
            ("add", []) => ShellCommand::DishAdd,
            ("edit", [id]) => ShellCommand::DishEdit(id.clone()),
            ("toggle", [id]) => ShellCommand::DishToggle(id.clone()),
            ("delete", [id]) => ShellCommand::DishDelete(id.clone()),
            _ => return Err("usage: dish add | dish edit <id> | dish toggle <id> | dish delete <id>".into()),
        },
        ("dish", _) => return Err("usage: dish add | dish edit <id> | dish toggle <id> | dish delete <id>".into()),
        ("orders", _) => ShellCommand::Orders {
            search: args.join(" "),
        },
        ("filter", [status]) if status.eq_ignore_ascii_case("all") => ShellCommand::OrdersFilter(None),
        ("filter", [status]) => ShellCommand::OrdersFilter(Some(status.parse()?)),
        ("filter", _) => return Err("usage: filter <status|all>".into()),
        ("order", [sub, id, status]) if sub == "status" => ShellCommand::SetOrderStatus {
            id: id.clone(),
            status: status.parse()?,
        },
        ("order", [sub, id]) if sub == "delete" => ShellCommand::OrderDelete(id.clone()),
        ("order", _) => return Err("usage: order status <id> <status> | order delete <id>".into()),
        ("users", _) => ShellCommand::Users {
            search: args.join(" "),
        },
        ("user", [sub, id, status]) if sub == "status" => ShellCommand::SetUserStatus {
            id: id.clone(),
            status: status.parse()?,
        },
        ("user", [sub, id]) if sub == "delete" => ShellCommand::UserDelete(id.clone()),
        ("user", _) => return Err("usage: user status <id> <status> | user delete <id>".into()),
        ("dashboard", _) => ShellCommand::Dashboard,
        (other, _) => return Err(format!("unknown command '{other}', type `help`")),
    };
    Ok(Some(cmd))
}
