//! Compares a few users against a running backend and saves their download links.
//!
//! 1. Point `DOUYIN_API_URL` at the backend (or `DOUYIN_API_ORIGIN` at the host serving `/api`).
//! 2. Run `cargo run --example compare_users -- <user-id> <user-id> ...`.
//! 3. The comparison result is printed and the links are written to `links.bin`.

// crates.io
use color_eyre::{Result, eyre::eyre};
// self
use douyin_compare_client::{
	api::{ApiClient, DouyinUserApi, UserId, VideoQuery},
	config::ClientConfig,
	interceptor::AttachHeader,
};

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;

	let user_ids = UserId::many(std::env::args().skip(1))?;
	let first = user_ids.first().ok_or_else(|| eyre!("Pass at least one user identifier."))?;
	let mut client = ApiClient::new(ClientConfig::from_env())?;

	if let Ok(token) = std::env::var("DOUYIN_API_TOKEN") {
		client = client.with_request_interceptor(AttachHeader::bearer(&token)?);
	}

	let api = DouyinUserApi::new(client);
	let comparison = api.compare_users(&user_ids).await?;

	println!("comparison: {comparison:#}");

	let info = api.get_user_info(first).await?;
	let videos = api
		.get_user_videos(first, &VideoQuery::from([("count".to_owned(), "10".to_owned())]))
		.await?;

	println!("{first}: {info}");
	println!("{first} videos: {videos}");

	let links = api.download_user_links(&user_ids).await?;

	links.save_to("links.bin")?;

	println!("saved {} bytes to links.bin", links.len());

	Ok(())
}
