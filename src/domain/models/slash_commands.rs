#[cfg(test)]
#[path = "slash_commands_test.rs"]
mod tests;

pub struct SlashCommand {
    command: String,
    pub args: Vec<String>,
}

impl SlashCommand {
    pub fn parse(text: &str) -> Option<SlashCommand> {
        let mut args = text
            .trim()
            .split(' ')
            .map(|e| return e.to_string())
            .collect::<Vec<String>>();
        let prefix = args[0].to_string();
        args.remove(0);

        let cmd = SlashCommand {
            command: prefix,
            args,
        };
        if cmd.is_quit()
            || cmd.is_history()
            || cmd.is_grow()
            || cmd.is_shrink()
            || cmd.is_login()
            || cmd.is_logout()
            || cmd.is_help()
        {
            return Some(cmd);
        }

        return None;
    }

    pub fn is_quit(&self) -> bool {
        return ["/q", "/quit", "/exit"].contains(&self.command.as_str());
    }

    pub fn is_history(&self) -> bool {
        return ["/hi", "/history"].contains(&self.command.as_str());
    }

    pub fn is_grow(&self) -> bool {
        return ["/g", "/grow", "/bigger"].contains(&self.command.as_str());
    }

    pub fn is_shrink(&self) -> bool {
        return ["/s", "/shrink", "/smaller"].contains(&self.command.as_str());
    }

    pub fn is_login(&self) -> bool {
        return ["/login"].contains(&self.command.as_str());
    }

    pub fn is_logout(&self) -> bool {
        return ["/logout"].contains(&self.command.as_str());
    }

    pub fn is_help(&self) -> bool {
        return ["/h", "/help"].contains(&self.command.as_str());
    }
}
