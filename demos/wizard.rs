use std::{
    io::{self, BufRead, Write},
    sync::Arc,
};

use dotenvy::dotenv;
use tweetjam::{
    client::ProxyClient,
    config::Config,
    error::Error,
    prelude::*,
    service::Service,
    token::CookieTokenStore,
    wizard::{Step, Wizard},
};

fn prompt(message: &str) -> String {
    print!("{message}");
    io::stdout().flush().expect("failed to flush stdout");

    let mut line = String::new();
    io::stdin().lock().read_line(&mut line).expect("failed to read stdin");
    line.trim().to_owned()
}

#[tokio::main]
async fn main() {
    dotenv().ok();
    env_logger::init();

    let config = Config::from_env();

    // the backend's cookies, as copied from the browser. they carry the tokens for both services
    let cookies = Arc::new(CookieTokenStore::from_cookie_header(
        &std::env::var("TWEETJAM_COOKIES").unwrap_or_default(),
    ));

    let client = ProxyClient::builder(config.proxy_url())
        .cookie_jar(Arc::clone(&cookies))
        .build()
        .expect("failed to build proxy client");

    let mut wizard = Wizard::new(client, cookies, config);

    // the URL the backend redirected to after a sign-in, e.g. "/?service=spotify&success=1"
    if let Some(url) = std::env::args().nth(1) {
        if let Some(cleaned) = wizard.mount(&url).await.expect("invalid page URL") {
            println!("(address bar is now {cleaned})");
        }
    }

    loop {
        match wizard.step() {
            Step::Start => {
                prompt("Create a playlist from your Twitter Bookmarks. Press enter to get started.");
                wizard.get_started().await.expect("not at the intro screen");
            }

            step @ (Step::Spotify | Step::Twitter) => {
                let service = if step == Step::Spotify {
                    Service::Spotify
                } else {
                    Service::Twitter
                };

                let cookie = prompt(&format!(
                    "Sign in at {} and paste the {} cookie here: ",
                    wizard.authorize_url(service),
                    service.token_key()
                ));

                let updated = format!("{}={cookie}", service.token_key());
                let jar = CookieTokenStore::from_cookie_header(&updated);

                match jar.get(service) {
                    Some(token) => {
                        wizard.token_store().set(service, token);
                        wizard.sign_in_succeeded(service).await.expect("not at a sign-in screen");
                    }
                    None => println!("That doesn't look like a token."),
                }
            }

            Step::AddTracksFromSearch => {
                println!("Looks like you don't have Spotify tracks in your Bookmarks. Here are some suggestions:");
                wizard.load_suggestions().await.expect("not at the search screen");

                if wizard.state().flags().track_list_error {
                    prompt("Couldn't load suggestions. Press enter to try again.");
                    continue;
                }

                if let Some(tweets) = wizard.state().bookmarkable_tweets() {
                    for tweet in &tweets.data {
                        println!("  {}", tweet.text.replace('\n', " "));
                    }
                }

                prompt("Press enter to add them to your Twitter Bookmarks.");
                if let Err(e) = wizard.add_tweets_to_bookmarks().await {
                    println!("{e}");
                }

                if wizard.state().flags().notification_open {
                    println!("Nice! These songs are now in your Twitter Bookmarks.");
                    wizard.close_notification().await;
                }
            }

            Step::AddTracksFromBookmarks => {
                println!("I found some good tracks in your Bookmarks:");
                wizard.load_tracks().await.expect("not at the bookmarks screen");

                if wizard.step() != Step::AddTracksFromBookmarks {
                    continue;
                }

                for discovered in wizard.state().tracks().iter() {
                    println!("  {} - {}", discovered.track.artist_names(), discovered.track.name);
                }

                prompt("Press enter to add them to a Spotify playlist.");
                match wizard.create_playlist().await {
                    Ok(()) => {}
                    Err(Error::EmptyPlaylist) => {
                        prompt("None of the tracks could be found on Spotify. Press enter to look again.");
                    }
                    Err(e) => {
                        println!("{e}");
                        return;
                    }
                }
            }

            Step::End => {
                let link = wizard
                    .state()
                    .playlist()
                    .and_then(|playlist| playlist.link())
                    .unwrap_or_default();
                println!("Success! You created your Twitter Jam: {link}");
                return;
            }

            Step::Error => {
                prompt("Something went wrong while talking to the internet. Press enter to retry.");
                wizard.retry().await.expect("not at the error screen");
            }
        }
    }
}
