//! `post` subcommands: admin management of the post collection.
//!
//! Reads are open; every mutation signs in through the identity provider
//! first and signs out when done.

use crate::{
    admin::{Credentials, IdentityProvider},
    cli::{AuthArgs, PostArgs, PostCommands},
    log,
    post::PostDraft,
    resolve::Resolver,
    store::DataSource,
    utils::slug::slugify,
};
use anyhow::{Context, Result, bail};
use std::fs;

pub async fn run<S: DataSource, I: IdentityProvider>(
    command: &PostCommands,
    source: &S,
    identity: &I,
) -> Result<()> {
    match command {
        PostCommands::List => list(source).await,
        PostCommands::Show { ident } => show(source, ident).await,
        PostCommands::Add { auth, post } => {
            let draft = to_draft(post)?;
            as_admin(identity, auth, async {
                let post = source.create_post(draft).await?;
                log!("post"; "created {} at /post/{}", post.id, post.route_key());
                anyhow::Ok(())
            })
            .await
        }
        PostCommands::Update { id, auth, post } => {
            let draft = to_draft(post)?;
            as_admin(identity, auth, async {
                let post = source.update_post(id, draft).await?;
                log!("post"; "updated {} at /post/{}", post.id, post.route_key());
                anyhow::Ok(())
            })
            .await
        }
        PostCommands::Delete { id, auth } => {
            as_admin(identity, auth, async {
                source.delete_post(id).await?;
                log!("post"; "deleted {id}");
                anyhow::Ok(())
            })
            .await
        }
    }
}

async fn list<S: DataSource>(source: &S) -> Result<()> {
    let posts = source.list_posts().await?;
    if posts.is_empty() {
        log!("post"; "no posts yet");
        return Ok(());
    }
    for post in posts {
        println!(
            "{:<20}  {}  {:<32}  {}",
            post.id,
            post.date_ymd(),
            post.route_key(),
            post.title
        );
    }
    Ok(())
}

async fn show<S: DataSource>(source: &S, ident: &str) -> Result<()> {
    let Some(post) = Resolver::default().resolve(source, ident).await? else {
        bail!("No post matches `{ident}`");
    };
    println!("{}", serde_json::to_string_pretty(&post)?);
    Ok(())
}

/// Run `action` inside a signed-in admin session.
async fn as_admin<I, F>(identity: &I, auth: &AuthArgs, action: F) -> Result<()>
where
    I: IdentityProvider,
    F: Future<Output = Result<()>>,
{
    let session = identity
        .sign_in(&Credentials::new(auth.email.as_str(), auth.password.as_str()))
        .await?;
    log!("admin"; "signed in as {}", session.email);

    let result = action.await;
    identity.sign_out(session).await;
    result
}

fn to_draft(args: &PostArgs) -> Result<PostDraft> {
    let content = match &args.content_file {
        Some(path) => Some(
            fs::read_to_string(path)
                .with_context(|| format!("Failed to read {}", path.display()))?,
        ),
        None => None,
    };

    Ok(PostDraft {
        title: args.title.clone(),
        slug: args.slug.as_deref().map(slugify),
        excerpt: args.excerpt.clone(),
        meta_description: args.meta_description.clone(),
        meta_keywords: args.meta_keywords.clone(),
        image_url: args.image_url.clone(),
        author: args.author.clone(),
        content,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        admin::{ConfigIdentity, hash_password},
        post::tests::sample_post,
        store::JsonStore,
    };
    use tempfile::TempDir;

    const EMAIL: &str = "editor@crickethub.test";

    fn identity() -> ConfigIdentity {
        ConfigIdentity::new(EMAIL, &hash_password("hunter2").unwrap())
    }

    fn auth(password: &str) -> AuthArgs {
        AuthArgs {
            email: EMAIL.into(),
            password: password.into(),
        }
    }

    #[tokio::test]
    async fn test_add_with_content_file() {
        let dir = TempDir::new().unwrap();
        let content = dir.path().join("body.html");
        fs::write(&content, "<p>Day one</p>").unwrap();

        let store = JsonStore::in_memory();
        let command = PostCommands::Add {
            auth: auth("hunter2"),
            post: PostArgs {
                title: Some("Day One".into()),
                slug: Some("Day One Report".into()),
                content_file: Some(content),
                ..PostArgs::default()
            },
        };
        run(&command, &store, &identity()).await.unwrap();

        let post = store.get_post_by_slug("day-one-report").await.unwrap().unwrap();
        assert_eq!(post.content, "<p>Day one</p>");
    }

    #[tokio::test]
    async fn test_mutation_requires_valid_credentials() {
        let store = JsonStore::with_posts(vec![sample_post("abc123", None)]);
        let command = PostCommands::Delete {
            id: "abc123".into(),
            auth: auth("wrong"),
        };

        assert!(run(&command, &store, &identity()).await.is_err());
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn test_update_and_delete() {
        let store = JsonStore::with_posts(vec![sample_post("abc123", None)]);
        let update = PostCommands::Update {
            id: "abc123".into(),
            auth: auth("hunter2"),
            post: PostArgs {
                excerpt: Some("New excerpt".into()),
                ..PostArgs::default()
            },
        };
        run(&update, &store, &identity()).await.unwrap();
        let post = store.get_post_by_id("abc123").await.unwrap().unwrap();
        assert_eq!(post.excerpt, "New excerpt");

        let delete = PostCommands::Delete {
            id: "abc123".into(),
            auth: auth("hunter2"),
        };
        run(&delete, &store, &identity()).await.unwrap();
        assert_eq!(store.len(), 0);
    }

    #[tokio::test]
    async fn test_show_missing_fails() {
        let store = JsonStore::in_memory();
        let command = PostCommands::Show {
            ident: "nope".into(),
        };
        assert!(run(&command, &store, &identity()).await.is_err());
    }

    #[test]
    fn test_to_draft_missing_content_file() {
        let args = PostArgs {
            content_file: Some("/definitely/not/here.html".into()),
            ..PostArgs::default()
        };
        assert!(to_draft(&args).is_err());
    }
}
