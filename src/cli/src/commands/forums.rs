//! Forum, topic and post commands.

use anyhow::Result;
use clap::Subcommand;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tabled::Tabled;

use crate::client::ApiClient;
use crate::output::{self, OutputFormat};

#[derive(Subcommand)]
pub enum ForumCommands {
    /// List forums
    List {
        #[arg(short, long, default_value = "20")]
        limit: i32,
    },

    /// List the topics of a forum
    Topics {
        /// Forum ID
        forum_id: String,
        #[arg(short, long, default_value = "20")]
        limit: i32,
    },

    /// List the posts of a topic
    Posts {
        /// Topic ID
        topic_id: String,
        #[arg(short, long, default_value = "20")]
        limit: i32,
    },

    /// Start a topic in a forum
    NewTopic {
        /// Forum ID
        forum_id: String,
        #[arg(short, long)]
        title: String,
        #[arg(short, long)]
        content: String,
    },

    /// Reply to a topic
    Reply {
        /// Topic ID
        topic_id: String,
        #[arg(short, long)]
        content: String,
    },
}

#[derive(Debug, Deserialize, Serialize, Tabled)]
#[serde(rename_all = "camelCase")]
struct ForumRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Title")]
    title: String,
    #[tabled(rename = "Topics")]
    topic_count: u64,
}

#[derive(Debug, Deserialize, Serialize, Tabled)]
#[serde(rename_all = "camelCase")]
struct TopicRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Title")]
    title: String,
    #[tabled(rename = "Author")]
    author_id: String,
    #[tabled(rename = "Posts")]
    post_count: u64,
}

#[derive(Debug, Deserialize, Serialize, Tabled)]
#[serde(rename_all = "camelCase")]
struct PostRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Author")]
    author_id: String,
    #[tabled(rename = "Content")]
    content: String,
    #[tabled(rename = "Posted")]
    created_at: String,
}

pub async fn execute(cmd: ForumCommands, client: &ApiClient, format: OutputFormat) -> Result<()> {
    match cmd {
        ForumCommands::List { limit } => {
            let forums: Vec<ForumRow> = client
                .graphql(
                    "query($limit: Int) { listForums(limit: $limit) { id title topicCount } }",
                    json!({ "limit": limit }),
                    "listForums",
                )
                .await?;
            output::print_list(&forums, format)?;
        }

        ForumCommands::Topics { forum_id, limit } => {
            let topics: Vec<TopicRow> = client
                .graphql(
                    "query($forumId: ID!, $limit: Int) { \
                     listTopics(forumId: $forumId, limit: $limit) { id title authorId postCount } }",
                    json!({ "forumId": forum_id, "limit": limit }),
                    "listTopics",
                )
                .await?;
            output::print_list(&topics, format)?;
        }

        ForumCommands::Posts { topic_id, limit } => {
            let mut posts: Vec<PostRow> = client
                .graphql(
                    "query($topicId: ID!, $limit: Int) { \
                     listPosts(topicId: $topicId, limit: $limit) { id authorId content createdAt } }",
                    json!({ "topicId": topic_id, "limit": limit }),
                    "listPosts",
                )
                .await?;
            if matches!(format, OutputFormat::Table) {
                for post in &mut posts {
                    post.content = output::truncate(&post.content, 60);
                }
            }
            output::print_list(&posts, format)?;
        }

        ForumCommands::NewTopic {
            forum_id,
            title,
            content,
        } => {
            let topic: TopicRow = client
                .graphql(
                    "mutation($input: CreateTopicInput!) { \
                     createTopic(input: $input) { id title authorId postCount } }",
                    json!({ "input": { "forumId": forum_id, "title": title, "content": content } }),
                    "createTopic",
                )
                .await?;
            output::print_success(&format!("Started topic {} ({})", topic.title, topic.id));
        }

        ForumCommands::Reply { topic_id, content } => {
            let post: PostRow = client
                .graphql(
                    "mutation($input: CreatePostInput!) { \
                     createPost(input: $input) { id authorId content createdAt } }",
                    json!({ "input": { "topicId": topic_id, "content": content } }),
                    "createPost",
                )
                .await?;
            output::print_success(&format!("Posted reply {}", post.id));
        }
    }

    Ok(())
}
