//! REPL input parsing.

use tienda_application::UserAction;

/// Slash commands offered for completion and hints.
pub const COMMANDS: &[&str] = &[
    "/buscar",
    "/search",
    "/agregar",
    "/add",
    "/carrito",
    "/vaciar",
    "/pedido",
    "/actualizar",
    "/ayuda",
    "/salir",
];

/// One line of REPL input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Action(UserAction),
    /// Add by row of the last listing shown; the REPL supplies its generation.
    Add { row: usize },
    /// Show the cart panel without changing anything.
    ShowCart,
    Help,
    Quit,
}

/// Parses an already trimmed, non-empty line.
///
/// Anything that is not a command is a chat message.
pub fn parse(line: &str) -> Result<Command, String> {
    if line == "quit" || line == "exit" {
        return Ok(Command::Quit);
    }
    if !line.starts_with('/') {
        return Ok(Command::Action(UserAction::SendMessage(line.to_string())));
    }

    let (name, arg) = match line.split_once(char::is_whitespace) {
        Some((name, arg)) => (name, arg.trim()),
        None => (line, ""),
    };

    let command = match name {
        "/buscar" | "/search" => Command::Action(UserAction::Search(arg.to_string())),
        "/agregar" | "/add" => {
            let row = arg
                .parse::<usize>()
                .map_err(|_| format!("Uso: {name} <número de fila>"))?;
            Command::Add { row }
        }
        "/carrito" | "/cart" => Command::ShowCart,
        "/vaciar" | "/clear" => Command::Action(UserAction::ClearCart),
        "/pedido" | "/checkout" => Command::Action(UserAction::Checkout),
        "/actualizar" | "/refresh" => Command::Action(UserAction::RefreshCatalog),
        "/ayuda" | "/help" => Command::Help,
        "/salir" => Command::Quit,
        other => return Err(format!("Comando desconocido: {other}. Probá /ayuda.")),
    };
    Ok(command)
}

pub const HELP: &str = "\
/buscar [texto]     lista productos (sin texto: los primeros de la lista)
/agregar <fila>     agrega el producto de esa fila al carrito
/carrito            muestra el carrito
/vaciar             vacía el carrito
/pedido             arma el mensaje de pedido para WhatsApp
/actualizar         vuelve a descargar la lista de precios
/salir              termina la sesión
Cualquier otro texto se le pregunta al vendedor.";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_text_is_chat() {
        assert_eq!(
            parse("¿Qué malla uso?").unwrap(),
            Command::Action(UserAction::SendMessage("¿Qué malla uso?".into()))
        );
    }

    #[test]
    fn test_search_with_and_without_query() {
        assert_eq!(
            parse("/buscar malla 6mm").unwrap(),
            Command::Action(UserAction::Search("malla 6mm".into()))
        );
        assert_eq!(
            parse("/search").unwrap(),
            Command::Action(UserAction::Search(String::new()))
        );
    }

    #[test]
    fn test_add_requires_row_number() {
        assert_eq!(parse("/agregar 3").unwrap(), Command::Add { row: 3 });
        assert!(parse("/agregar").is_err());
        assert!(parse("/add tres").is_err());
    }

    #[test]
    fn test_other_commands() {
        assert_eq!(parse("/carrito").unwrap(), Command::ShowCart);
        assert_eq!(parse("/vaciar").unwrap(), Command::Action(UserAction::ClearCart));
        assert_eq!(parse("/pedido").unwrap(), Command::Action(UserAction::Checkout));
        assert_eq!(
            parse("/actualizar").unwrap(),
            Command::Action(UserAction::RefreshCatalog)
        );
        assert_eq!(parse("quit").unwrap(), Command::Quit);
        assert!(parse("/nada").is_err());
    }

    #[test]
    fn test_every_listed_command_parses() {
        for command in COMMANDS {
            let line = match *command {
                "/agregar" | "/add" => format!("{command} 0"),
                _ => command.to_string(),
            };
            assert!(parse(&line).is_ok(), "{line}");
        }
    }
}
