/// The commands a user can type at the shell prompt.
///
/// Each one maps to a handler registered in `handlers.rs`; the alias is
/// what the user types and the help line documents its arguments.
#[derive(Eq, Hash, PartialEq, Debug, Clone, Copy)]
pub enum InterfaceCommand {
    CONNECT,
    LOGIN,
    CD,
    CDUP,
    QUIT,
    PASSIVE,
    GET,
    PWD,
    LS,
    SERVERHELP,
    HELP,
}

impl InterfaceCommand {
    pub fn alias(&self) -> &'static str {
        match self {
            InterfaceCommand::CONNECT => "connect",
            InterfaceCommand::LOGIN => "login",
            InterfaceCommand::CD => "cd",
            InterfaceCommand::CDUP => "cdup",
            InterfaceCommand::QUIT => "quit",
            InterfaceCommand::PASSIVE => "passive",
            InterfaceCommand::GET => "get",
            InterfaceCommand::PWD => "pwd",
            InterfaceCommand::LS => "ls",
            InterfaceCommand::SERVERHELP => "serverhelp",
            InterfaceCommand::HELP => "help",
        }
    }

    pub fn help_line(&self) -> &'static str {
        match self {
            InterfaceCommand::CONNECT => {
                " <hostname>:<port> : connect to the specified server.  Default port is 21.\n"
            }
            InterfaceCommand::LOGIN => {
                " -u <username> -p <password> : Log in to the server.\n"
            }
            InterfaceCommand::CD => " <path> : Change directory.\n",
            InterfaceCommand::CDUP => " : go up a directory.\n",
            InterfaceCommand::QUIT => " : exit rouilleftp.\n",
            InterfaceCommand::PASSIVE => {
                " [-e]: enter PASV mode with selected data port.  Use the -e flag for EPSV\n"
            }
            InterfaceCommand::GET => " <filename> [local] : download the selected file.\n",
            InterfaceCommand::PWD => " : print the current server directory.\n",
            InterfaceCommand::LS => " [directory] : list the contents of the server directory.\n",
            InterfaceCommand::SERVERHELP => {
                " [command] : show the server's help message (for the given command).\n"
            }
            InterfaceCommand::HELP => " : show this message.\n",
        }
    }

    pub fn all() -> &'static [InterfaceCommand] {
        &[
            InterfaceCommand::CONNECT,
            InterfaceCommand::LOGIN,
            InterfaceCommand::CD,
            InterfaceCommand::CDUP,
            InterfaceCommand::QUIT,
            InterfaceCommand::PASSIVE,
            InterfaceCommand::GET,
            InterfaceCommand::PWD,
            InterfaceCommand::LS,
            InterfaceCommand::SERVERHELP,
            InterfaceCommand::HELP,
        ]
    }

    pub fn from_alias(alias: &str) -> Option<InterfaceCommand> {
        match alias.to_ascii_lowercase().as_str() {
            "connect" => Some(InterfaceCommand::CONNECT),
            "login" => Some(InterfaceCommand::LOGIN),
            "cd" => Some(InterfaceCommand::CD),
            "cdup" => Some(InterfaceCommand::CDUP),
            "quit" => Some(InterfaceCommand::QUIT),
            "passive" => Some(InterfaceCommand::PASSIVE),
            "get" => Some(InterfaceCommand::GET),
            "pwd" => Some(InterfaceCommand::PWD),
            "ls" => Some(InterfaceCommand::LS),
            "serverhelp" => Some(InterfaceCommand::SERVERHELP),
            "help" => Some(InterfaceCommand::HELP),
            _ => None,
        }
    }

    /// One line per command, alias followed by its help text.
    pub fn help_text() -> String {
        let mut text = String::new();
        for command in InterfaceCommand::all() {
            text.push_str(command.alias());
            text.push_str(command.help_line());
        }
        text
    }
}
