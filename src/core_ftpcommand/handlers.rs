use crate::core_ftpcommand::ftpcommand::FtpCommand;
use crate::core_ftpcommand::interface::InterfaceCommand;
use crate::core_protocol::machine::FtpClient;
use crate::error::ClientError;
use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

/// What the shell should do once an interface command returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Continue,
    Exit,
}

/// A user-facing command: the whole argument vector, an outcome for the
/// shell.
pub type InterfaceHandler = Box<
    dyn Fn(
            Arc<FtpClient>,
            Vec<String>, // Arguments after the command alias
        ) -> Pin<Box<dyn Future<Output = Result<Outcome, ClientError>> + Send>>
        + Send
        + Sync,
>;

/// A protocol verb: at most one argument, already validated upstream.
pub type ProtocolHandler = Box<
    dyn Fn(
            Arc<FtpClient>,
            Option<String>,
        ) -> Pin<Box<dyn Future<Output = Result<(), ClientError>> + Send>>
        + Send
        + Sync,
>;

pub fn initialize_interface_handlers() -> HashMap<InterfaceCommand, Arc<InterfaceHandler>> {
    let mut handlers: HashMap<InterfaceCommand, Arc<InterfaceHandler>> = HashMap::new();

    handlers.insert(
        InterfaceCommand::CONNECT,
        Arc::new(Box::new(|client, args| {
            Box::pin(crate::core_ftpcommand::connect::handle_connect_command(
                client, args,
            ))
        })),
    );

    handlers.insert(
        InterfaceCommand::LOGIN,
        Arc::new(Box::new(|client, args| {
            Box::pin(crate::core_ftpcommand::login::handle_login_command(
                client, args,
            ))
        })),
    );

    handlers.insert(
        InterfaceCommand::CD,
        Arc::new(Box::new(|client, args| {
            Box::pin(crate::core_ftpcommand::cd::handle_cd_command(client, args))
        })),
    );

    handlers.insert(
        InterfaceCommand::CDUP,
        Arc::new(Box::new(|client, args| {
            Box::pin(crate::core_ftpcommand::cdup::handle_cdup_command(
                client, args,
            ))
        })),
    );

    handlers.insert(
        InterfaceCommand::QUIT,
        Arc::new(Box::new(|client, args| {
            Box::pin(crate::core_ftpcommand::quit::handle_quit_command(
                client, args,
            ))
        })),
    );

    handlers.insert(
        InterfaceCommand::PASSIVE,
        Arc::new(Box::new(|client, args| {
            Box::pin(crate::core_ftpcommand::passive::handle_passive_command(
                client, args,
            ))
        })),
    );

    handlers.insert(
        InterfaceCommand::GET,
        Arc::new(Box::new(|client, args| {
            Box::pin(crate::core_ftpcommand::get::handle_get_command(
                client, args,
            ))
        })),
    );

    handlers.insert(
        InterfaceCommand::PWD,
        Arc::new(Box::new(|client, args| {
            Box::pin(crate::core_ftpcommand::pwd::handle_pwd_command(
                client, args,
            ))
        })),
    );

    handlers.insert(
        InterfaceCommand::LS,
        Arc::new(Box::new(|client, args| {
            Box::pin(crate::core_ftpcommand::ls::handle_ls_command(client, args))
        })),
    );

    handlers.insert(
        InterfaceCommand::SERVERHELP,
        Arc::new(Box::new(|client, args| {
            Box::pin(
                crate::core_ftpcommand::serverhelp::handle_serverhelp_command(client, args),
            )
        })),
    );

    handlers.insert(
        InterfaceCommand::HELP,
        Arc::new(Box::new(|client, args| {
            Box::pin(crate::core_ftpcommand::help::handle_help_command(
                client, args,
            ))
        })),
    );

    handlers
}

pub fn initialize_protocol_handlers() -> HashMap<FtpCommand, Arc<ProtocolHandler>> {
    let mut handlers: HashMap<FtpCommand, Arc<ProtocolHandler>> = HashMap::new();

    handlers.insert(
        FtpCommand::USER,
        Arc::new(Box::new(|client, arg| {
            Box::pin(crate::core_ftpcommand::protocol::handle_user_command(
                client, arg,
            ))
        })),
    );

    handlers.insert(
        FtpCommand::PASS,
        Arc::new(Box::new(|client, arg| {
            Box::pin(crate::core_ftpcommand::protocol::handle_pass_command(
                client, arg,
            ))
        })),
    );

    handlers.insert(
        FtpCommand::CWD,
        Arc::new(Box::new(|client, arg| {
            Box::pin(crate::core_ftpcommand::protocol::handle_cwd_command(
                client, arg,
            ))
        })),
    );

    handlers.insert(
        FtpCommand::CDUP,
        Arc::new(Box::new(|client, arg| {
            Box::pin(crate::core_ftpcommand::protocol::handle_cdup_command(
                client, arg,
            ))
        })),
    );

    handlers.insert(
        FtpCommand::QUIT,
        Arc::new(Box::new(|client, arg| {
            Box::pin(crate::core_ftpcommand::protocol::handle_quit_command(
                client, arg,
            ))
        })),
    );

    handlers.insert(
        FtpCommand::PASV,
        Arc::new(Box::new(|client, arg| {
            Box::pin(crate::core_ftpcommand::protocol::handle_pasv_command(
                client, arg,
            ))
        })),
    );

    handlers.insert(
        FtpCommand::EPSV,
        Arc::new(Box::new(|client, arg| {
            Box::pin(crate::core_ftpcommand::protocol::handle_epsv_command(
                client, arg,
            ))
        })),
    );

    handlers.insert(
        FtpCommand::PORT,
        Arc::new(Box::new(|client, arg| {
            Box::pin(crate::core_ftpcommand::protocol::handle_port_command(
                client, arg,
            ))
        })),
    );

    handlers.insert(
        FtpCommand::EPRT,
        Arc::new(Box::new(|client, arg| {
            Box::pin(crate::core_ftpcommand::protocol::handle_eprt_command(
                client, arg,
            ))
        })),
    );

    handlers.insert(
        FtpCommand::RETR,
        Arc::new(Box::new(|client, arg| {
            Box::pin(crate::core_ftpcommand::protocol::handle_retr_command(
                client, arg,
            ))
        })),
    );

    handlers.insert(
        FtpCommand::PWD,
        Arc::new(Box::new(|client, arg| {
            Box::pin(crate::core_ftpcommand::protocol::handle_pwd_command(
                client, arg,
            ))
        })),
    );

    handlers.insert(
        FtpCommand::LIST,
        Arc::new(Box::new(|client, arg| {
            Box::pin(crate::core_ftpcommand::protocol::handle_list_command(
                client, arg,
            ))
        })),
    );

    handlers.insert(
        FtpCommand::HELP,
        Arc::new(Box::new(|client, arg| {
            Box::pin(crate::core_ftpcommand::protocol::handle_help_command(
                client, arg,
            ))
        })),
    );

    handlers.insert(
        FtpCommand::NOOP,
        Arc::new(Box::new(|client, arg| {
            Box::pin(crate::core_ftpcommand::protocol::handle_noop_command(
                client, arg,
            ))
        })),
    );

    handlers
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_interface_command_has_a_handler() {
        let handlers = initialize_interface_handlers();
        for command in InterfaceCommand::all() {
            assert!(handlers.contains_key(command), "missing {:?}", command);
        }
    }

    #[test]
    fn test_every_protocol_verb_has_a_handler() {
        let handlers = initialize_protocol_handlers();
        for command in FtpCommand::all() {
            assert!(handlers.contains_key(command), "missing {:?}", command);
        }
    }
}
