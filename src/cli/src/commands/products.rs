//! Product and category commands.

use anyhow::Result;
use clap::{Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tabled::Tabled;

use crate::client::ApiClient;
use crate::output::{self, OutputFormat};

const PRODUCT_FIELDS: &str =
    "id name tagline description websiteUrl categoryId ownerId tags status upvoteCount createdAt";

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum StatusArg {
    Pending,
    Submitted,
    Approved,
    Rejected,
}

impl StatusArg {
    fn as_graphql(self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Submitted => "SUBMITTED",
            Self::Approved => "APPROVED",
            Self::Rejected => "REJECTED",
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum DecisionArg {
    Approve,
    Reject,
}

#[derive(Subcommand)]
pub enum ProductCommands {
    /// List products, newest first
    List {
        /// Only products with this submission status
        #[arg(short, long)]
        status: Option<StatusArg>,
        /// Only products in this category
        #[arg(short, long)]
        category: Option<String>,
        /// Only products carrying this tag
        #[arg(short, long)]
        tag: Option<String>,
        #[arg(long, default_value = "0")]
        offset: i32,
        #[arg(short, long, default_value = "20")]
        limit: i32,
    },

    /// Show one product
    Show {
        /// Product ID
        id: String,
    },

    /// Create a product in pending status
    Create {
        #[arg(short, long)]
        name: String,
        #[arg(long)]
        tagline: String,
        #[arg(short, long)]
        description: String,
        #[arg(short, long)]
        website: String,
        #[arg(short, long)]
        category: Option<String>,
        /// Comma-separated tags
        #[arg(long, value_delimiter = ',')]
        tags: Vec<String>,
    },

    /// Submit a product for review
    Submit {
        /// Product ID
        id: String,
    },

    /// Approve or reject a submitted product (admin only)
    Review {
        /// Product ID
        id: String,
        decision: DecisionArg,
    },

    /// Upvote a product
    Upvote {
        /// Product ID
        id: String,
    },

    /// List product categories
    Categories,
}

#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
struct Product {
    id: String,
    name: String,
    tagline: String,
    description: String,
    website_url: String,
    category_id: Option<String>,
    owner_id: String,
    tags: Vec<String>,
    status: String,
    upvote_count: u64,
    created_at: String,
}

#[derive(Tabled, Serialize)]
struct ProductRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Tagline")]
    tagline: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Upvotes")]
    upvotes: u64,
}

impl From<&Product> for ProductRow {
    fn from(p: &Product) -> Self {
        Self {
            id: p.id.clone(),
            name: p.name.clone(),
            tagline: output::truncate(&p.tagline, 40),
            status: p.status.to_lowercase(),
            upvotes: p.upvote_count,
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Tabled)]
#[serde(rename_all = "camelCase")]
struct Category {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Slug")]
    slug: String,
}

#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
struct Upvote {
    product_id: String,
}

fn print_product(product: &Product, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Table => {
            output::print_header(&product.name);
            output::print_detail("ID", &product.id);
            output::print_detail("Tagline", &product.tagline);
            output::print_detail("Status", &product.status.to_lowercase());
            output::print_detail("Website", &product.website_url);
            output::print_detail("Owner", &product.owner_id);
            if let Some(category) = &product.category_id {
                output::print_detail("Category", category);
            }
            if !product.tags.is_empty() {
                output::print_detail("Tags", &product.tags.join(", "));
            }
            output::print_detail("Upvotes", &product.upvote_count.to_string());
            output::print_detail("Created", &product.created_at);
            println!();
            println!("{}", product.description);
            Ok(())
        }
        _ => output::print_item(product, format),
    }
}

pub async fn execute(cmd: ProductCommands, client: &ApiClient, format: OutputFormat) -> Result<()> {
    match cmd {
        ProductCommands::List {
            status,
            category,
            tag,
            offset,
            limit,
        } => {
            let query = format!(
                "query($filter: ProductFilter, $offset: Int, $limit: Int) {{ \
                 listProducts(filter: $filter, offset: $offset, limit: $limit) {{ {} }} }}",
                PRODUCT_FIELDS
            );
            let filter = json!({
                "status": status.map(StatusArg::as_graphql),
                "categoryId": category,
                "tag": tag,
            });
            let products: Vec<Product> = client
                .graphql(&query, json!({ "filter": filter, "offset": offset, "limit": limit }), "listProducts")
                .await?;
            match format {
                OutputFormat::Table => {
                    let rows: Vec<ProductRow> = products.iter().map(ProductRow::from).collect();
                    output::print_list(&rows, format)?;
                }
                _ => output::print_item(&products, format)?,
            }
        }

        ProductCommands::Show { id } => {
            let query = format!("query($id: ID!) {{ getProduct(id: $id) {{ {} }} }}", PRODUCT_FIELDS);
            let product: Product = client.graphql(&query, json!({ "id": id }), "getProduct").await?;
            print_product(&product, format)?;
        }

        ProductCommands::Create {
            name,
            tagline,
            description,
            website,
            category,
            tags,
        } => {
            let query = format!(
                "mutation($input: CreateProductInput!) {{ createProduct(input: $input) {{ {} }} }}",
                PRODUCT_FIELDS
            );
            let input = json!({
                "name": name,
                "tagline": tagline,
                "description": description,
                "websiteUrl": website,
                "categoryId": category,
                "tags": tags,
            });
            let product: Product = client.graphql(&query, json!({ "input": input }), "createProduct").await?;
            output::print_success(&format!("Created product {} ({})", product.name, product.id));
            print_product(&product, format)?;
        }

        ProductCommands::Submit { id } => {
            let query = format!("mutation($id: ID!) {{ submitProduct(id: $id) {{ {} }} }}", PRODUCT_FIELDS);
            let product: Product = client.graphql(&query, json!({ "id": id }), "submitProduct").await?;
            output::print_success(&format!("Submitted {} for review", product.name));
        }

        ProductCommands::Review { id, decision } => {
            let decision = match decision {
                DecisionArg::Approve => StatusArg::Approved,
                DecisionArg::Reject => StatusArg::Rejected,
            };
            let query = format!(
                "mutation($id: ID!, $decision: SubmissionStatus!) {{ \
                 reviewProduct(id: $id, decision: $decision) {{ {} }} }}",
                PRODUCT_FIELDS
            );
            let product: Product = client
                .graphql(&query, json!({ "id": id, "decision": decision.as_graphql() }), "reviewProduct")
                .await?;
            output::print_success(&format!("{} is now {}", product.name, product.status.to_lowercase()));
        }

        ProductCommands::Upvote { id } => {
            let upvote: Upvote = client
                .graphql(
                    "mutation($productId: ID!) { upvote(productId: $productId) { productId } }",
                    json!({ "productId": id }),
                    "upvote",
                )
                .await?;
            output::print_success(&format!("Upvoted {}", upvote.product_id));
        }

        ProductCommands::Categories => {
            let categories: Vec<Category> = client
                .graphql("{ listCategories(limit: 100) { id name slug } }", json!({}), "listCategories")
                .await?;
            output::print_list(&categories, format)?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_args_use_graphql_enum_values() {
        assert_eq!(StatusArg::Approved.as_graphql(), "APPROVED");
        assert_eq!(StatusArg::Pending.as_graphql(), "PENDING");
    }

    #[test]
    fn test_product_row_from_graphql_shape() {
        let product: Product = serde_json::from_value(json!({
            "id": "p1",
            "name": "Radar",
            "tagline": "Know when your dependencies ship",
            "description": "d",
            "websiteUrl": "https://radar.dev",
            "categoryId": null,
            "ownerId": "u1",
            "tags": ["rust"],
            "status": "APPROVED",
            "upvoteCount": 3,
            "createdAt": "2026-01-01T00:00:00Z"
        }))
        .unwrap();
        let row = ProductRow::from(&product);
        assert_eq!(row.status, "approved");
        assert_eq!(row.upvotes, 3);
    }
}
