use teloxide::{Bot, prelude::*, utils::command::BotCommands};

use crate::commands::Command;

pub async fn start_command(bot: Bot, msg: Message) -> ResponseResult<()> {
    let text = format!(
        "Welcome to the store! 🥭\n\n{}",
        Command::descriptions()
    );
    bot.send_message(msg.chat.id, text).await?;
    Ok(())
}
