use anyhow::Result;
use clap::Parser;
use skygate_app::{ActiveForm, SkygateApp};
use skygate_auth::{LoginForm, SignupForm};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, Lines, Stdin};

use cli::{Cli, Commands};

mod cli;
mod render;

const SHELL_HELP: &str = "\
Commands:
  city <name>   look up current weather (and forecast when logged in)
  signup        open the signup form
  login         open the login form
  logout        log out
  refresh       re-check the saved session
  help          show this help
  quit          exit";

#[tokio::main]
async fn main() -> Result<()> {
    skygate_core::init()?;

    let args = Cli::parse();
    let (config, _) = skygate_core::Config::load_validated(args.config_dir.as_deref())?;
    tracing::debug!("Config directory: {}", config.config_dir.display());

    let mut app = SkygateApp::from_config(&config)?;
    app.load().await;

    match args.command.unwrap_or(Commands::Shell) {
        Commands::Status => {
            if app.state().is_authenticated() {
                println!("Logged in");
            } else {
                println!("Logged out");
            }
        }
        Commands::Lookup { city } => {
            app.set_city(city);
            app.submit_city().await;
            show(&mut app);
        }
        Commands::Signup {
            name,
            email,
            password,
        } => {
            app.show_signup();
            app.submit_signup(SignupForm {
                name,
                email,
                password,
            })
            .await;
            print_notices(&mut app);
        }
        Commands::Login {
            email,
            password,
            city,
        } => {
            if let Some(city) = city {
                app.set_city(city);
            }
            app.show_login();
            app.submit_login(LoginForm { email, password }).await;
            show(&mut app);
        }
        Commands::Logout => {
            app.logout().await;
            println!("Logged out");
        }
        Commands::Shell => run_shell(&mut app).await?,
    }

    Ok(())
}

fn print_notices(app: &mut SkygateApp) {
    for notice in app.take_notices() {
        println!("! {}", notice);
    }
}

fn show(app: &mut SkygateApp) {
    print_notices(app);
    print!("{}", render::render(app.state()));
}

async fn prompt(lines: &mut Lines<BufReader<Stdin>>, label: &str) -> Result<Option<String>> {
    let mut stdout = tokio::io::stdout();
    stdout.write_all(format!("{}: ", label).as_bytes()).await?;
    stdout.flush().await?;
    Ok(lines.next_line().await?.map(|l| l.trim().to_string()))
}

async fn run_shell(app: &mut SkygateApp) -> Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    println!("{}", SHELL_HELP);
    show(app);

    loop {
        // Fill in whichever form is open before taking the next command
        match app.state().form {
            ActiveForm::Signup => {
                let (Some(name), Some(email), Some(password)) = (
                    prompt(&mut lines, "Name").await?,
                    prompt(&mut lines, "Email").await?,
                    prompt(&mut lines, "Password").await?,
                ) else {
                    break;
                };
                app.submit_signup(SignupForm {
                    name,
                    email,
                    password,
                })
                .await;
                // A failed signup leaves the form open; close it so the
                // user gets the command prompt back
                app.close_form();
                show(app);
                continue;
            }
            ActiveForm::Login => {
                let (Some(email), Some(password)) = (
                    prompt(&mut lines, "Email").await?,
                    prompt(&mut lines, "Password").await?,
                ) else {
                    break;
                };
                app.submit_login(LoginForm { email, password }).await;
                app.close_form();
                show(app);
                continue;
            }
            ActiveForm::None => {}
        }

        let Some(line) = prompt(&mut lines, "skygate").await? else {
            break;
        };
        let (command, rest) = line
            .split_once(' ')
            .map_or((line.as_str(), ""), |(c, r)| (c, r.trim()));

        match command {
            "" => {}
            "city" => {
                app.set_city(rest);
                app.submit_city().await;
                show(app);
            }
            "signup" => app.show_signup(),
            "login" => app.show_login(),
            "logout" => {
                app.logout().await;
                show(app);
            }
            "refresh" => {
                app.refresh_auth().await;
                show(app);
            }
            "help" => println!("{}", SHELL_HELP),
            "quit" | "exit" => break,
            other => println!("Unknown command: {} (try `help`)", other),
        }
    }

    Ok(())
}
