mod cli;
mod render;

use anyhow::{Context, Result};
use chirp_store::{
    connect, filter_chats, ChatListOrder, ChatService, DisplayConfig, FileAttachment,
    FollowManager, Identity, MessagePayload, MuteManager, NewUser, ProfileUpdate, StoreConfig,
    VoiceNote,
};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use cli::{Cli, Command};
use render::Palette;

#[tokio::main]
async fn main() -> Result<()> {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .try_init();

    let cli = Cli::parse();

    // Resolved once and handed to everything that renders
    let display = DisplayConfig {
        utc_offset_minutes: cli.utc_offset,
        color_scheme: cli.color_scheme.into(),
    };

    let db = connect(&StoreConfig {
        db_path: cli.db.clone(),
    })
    .await
    .with_context(|| format!("Failed to open database {}", cli.db.display()))?;

    let mutes = MuteManager::new(db.clone());
    let follows = FollowManager::new(db.clone());
    let service = ChatService::new(db, display);
    let identity = cli.subject.clone().map(Identity::new);

    run(cli, &service, &mutes, &follows, identity.as_ref()).await
}

async fn run(
    cli: Cli,
    service: &ChatService,
    mutes: &MuteManager,
    follows: &FollowManager,
    identity: Option<&Identity>,
) -> Result<()> {
    let palette = Palette::new(service.display().color_scheme);

    match cli.command {
        Command::Register {
            username,
            fullname,
            email,
            bio,
            image,
        } => {
            let subject = identity
                .map(|i| i.subject.clone())
                .context("--as <SUBJECT> is required to register")?;
            let id = service
                .users()
                .upsert_user(NewUser {
                    username,
                    fullname,
                    email,
                    bio,
                    image,
                    auth_subject: subject,
                })
                .await?;
            println!("{}", id);
        }
        Command::Whoami => {
            let me = service.current_user(identity).await?;
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&me)?);
            } else {
                render::print_user(&palette, &me);
            }
        }
        Command::Send { peer, text } => {
            send(service, identity, &peer, MessagePayload::text(text)).await?;
        }
        Command::SendFile {
            peer,
            url,
            name,
            mime_type,
            size,
        } => {
            let payload = MessagePayload::File(FileAttachment {
                url,
                name,
                mime_type,
                size,
            });
            send(service, identity, &peer, payload).await?;
        }
        Command::SendVoice {
            peer,
            url,
            duration,
            mime_type,
        } => {
            let payload = MessagePayload::VoiceNote(VoiceNote {
                url,
                duration,
                mime_type,
            });
            send(service, identity, &peer, payload).await?;
        }
        Command::Chats { recent, search } => {
            let me = service.current_user(identity).await?;
            let order = if recent {
                ChatListOrder::Recency
            } else {
                ChatListOrder::Discovery
            };
            let chats = service.chat_list_for(&me, order).await?;
            let shown = filter_chats(&chats, search.as_deref().unwrap_or_default());

            if cli.json {
                println!("{}", serde_json::to_string_pretty(&shown)?);
            } else {
                render::print_chats(&palette, &me.id, &shown);
            }
        }
        Command::Open { peer } => {
            let me = service.current_user(identity).await?;
            let chats = service.chat_list_for(&me, ChatListOrder::Discovery).await?;
            let entry = chats
                .iter()
                .find(|c| c.peer_id == peer)
                .with_context(|| format!("No conversation with {}", peer))?;

            match service.open_chat_for(&me, entry).await? {
                Some(read_at) => println!(
                    "Marked {} messages read at {}",
                    entry.message_ids.len(),
                    read_at
                ),
                None => println!("Nothing to mark read"),
            }
        }
        Command::History {
            peer,
            limit,
            before,
        } => {
            let me = service.current_user(identity).await?;
            let messages = service
                .messages()
                .chat_history(&me.id, &peer, limit, before)
                .await?;

            if cli.json {
                println!("{}", serde_json::to_string_pretty(&messages)?);
            } else {
                render::print_history(&palette, service.display(), &me.id, &messages);
            }
        }
        Command::Read { ids } => {
            let me = service.current_user(identity).await?;
            let read_at = service.messages().mark_as_read_for(&me.id, &ids).await?;
            println!("{}", read_at);
        }
        Command::Unread { peer } => {
            let me = service.current_user(identity).await?;
            let count = service.messages().unread_count(&me.id, &peer).await?;
            println!("{}", count);
        }
        Command::Archive { peer, undo } => {
            let me = service.current_user(identity).await?;
            let count = service.messages().archive_chat(&me.id, &peer, !undo).await?;
            println!("{}", count);
        }
        Command::Delete { peer } => {
            let me = service.current_user(identity).await?;
            let count = service.messages().delete_chat(&me.id, &peer).await?;
            println!("{}", count);
        }
        Command::Mute { peer, undo } => {
            let me = service.current_user(identity).await?;
            mutes.set_muted(&me.id, &peer, !undo).await?;
        }
        Command::Users => {
            let others = service.users().list_others(identity).await?;
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&others)?);
            } else {
                render::print_users(&palette, &others);
            }
        }
        Command::Follow { user } => {
            let me = service.current_user(identity).await?;
            let following = follows.toggle_follow(&me.id, &user).await?;
            println!("{}", if following { "following" } else { "not following" });
        }
        Command::IsFollowing { user } => {
            let me = service.current_user(identity).await?;
            println!("{}", follows.is_following(&me.id, &user).await?);
        }
        Command::Notifications => {
            let me = service.current_user(identity).await?;
            let notifications = follows.notifications_for(&me.id).await?;
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&notifications)?);
            } else {
                render::print_notifications(&palette, service.display(), &notifications);
            }
        }
        Command::Rename { username } => {
            let me = service.current_user(identity).await?;
            service.users().update_username(&me.id, &username).await?;
        }
        Command::Profile {
            fullname,
            bio,
            image,
        } => {
            let me = service.current_user(identity).await?;
            service
                .users()
                .update_profile(
                    &me.id,
                    ProfileUpdate {
                        fullname,
                        bio,
                        image,
                    },
                )
                .await?;
        }
    }

    Ok(())
}

async fn send(
    service: &ChatService,
    identity: Option<&Identity>,
    peer: &str,
    payload: MessagePayload,
) -> Result<()> {
    let me = service.current_user(identity).await?;
    let message = service
        .messages()
        .send_message(&me.id, peer, payload)
        .await?;
    println!("{}", message.id);
    Ok(())
}
