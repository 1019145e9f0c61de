//! Terminal output

use chirp_store::{
    chat_list, ChatListEntry, ColorScheme, DisplayConfig, Message, NotificationInfo, PeerProfile,
    UserInfo,
};
use console::Style;

/// Styles for one colour scheme
pub struct Palette {
    name: Style,
    secondary: Style,
    accent: Style,
    badge: Style,
}

impl Palette {
    pub fn new(scheme: ColorScheme) -> Self {
        let primary = Style::new().color256(166).bold();
        match scheme {
            ColorScheme::Light => Self {
                name: Style::new().black().bold(),
                secondary: Style::new().color256(242),
                accent: Style::new().color256(33),
                badge: primary,
            },
            ColorScheme::Dark => Self {
                name: Style::new().white().bold(),
                secondary: Style::new().color256(249),
                accent: Style::new().color256(161),
                badge: primary,
            },
        }
    }
}

pub fn print_chats(palette: &Palette, user_id: &str, entries: &[&ChatListEntry]) {
    if entries.is_empty() {
        println!("{}", palette.secondary.apply_to("No messages found"));
        return;
    }

    for entry in entries {
        let prefix = if entry.last_sender_id == user_id {
            "You: "
        } else {
            ""
        };
        let badge = if entry.unread_count > 0 {
            palette
                .badge
                .apply_to(format!(" ({})", entry.unread_count))
                .to_string()
        } else {
            String::new()
        };

        println!(
            "{}{}  {}",
            palette.name.apply_to(&entry.name),
            badge,
            palette.secondary.apply_to(&entry.time)
        );
        println!(
            "  {}{}  {}",
            prefix,
            entry.last_message,
            palette.secondary.apply_to(&entry.peer_id)
        );
    }
}

pub fn print_history(
    palette: &Palette,
    display: &DisplayConfig,
    user_id: &str,
    messages: &[Message],
) {
    for msg in messages {
        let who = if msg.sender_id == user_id {
            palette.accent.apply_to("me".to_string())
        } else {
            palette.name.apply_to(msg.sender_id.clone())
        };
        let read = if msg.read_at.is_some() { " ✓" } else { "" };

        println!(
            "{} {}: {}{}",
            palette.secondary.apply_to(display.format_time(msg.sent_at)),
            who,
            chat_list::preview(msg.payload.as_ref()),
            read
        );
    }
}

pub fn print_user(palette: &Palette, user: &UserInfo) {
    println!(
        "{} ({})",
        palette.name.apply_to(&user.username),
        user.fullname
    );
    println!("  id:    {}", user.id);
    println!("  email: {}", user.email);
    if let Some(bio) = &user.bio {
        println!("  bio:   {}", bio);
    }
    println!(
        "  {} followers, {} following, {} posts",
        user.followers, user.following, user.posts
    );
}

pub fn print_users(palette: &Palette, users: &[PeerProfile]) {
    if users.is_empty() {
        println!("{}", palette.secondary.apply_to("No other users"));
        return;
    }

    for user in users {
        println!(
            "{} ({})  {}",
            palette.name.apply_to(&user.username),
            user.fullname,
            palette.secondary.apply_to(&user.id)
        );
    }
}

pub fn print_notifications(
    palette: &Palette,
    display: &DisplayConfig,
    notifications: &[NotificationInfo],
) {
    for n in notifications {
        println!(
            "{} {} {}",
            palette.secondary.apply_to(display.format_time(n.created_at)),
            palette.accent.apply_to(&n.kind),
            n.sender_id
        );
    }
}
