pub fn print_banner() {
    let banner = format!(
        r#"
 ███████╗ ██████╗ ███╗   ██╗ █████╗ ██████╗
 ██╔════╝██╔═══██╗████╗  ██║██╔══██╗██╔══██╗   sonar
 ███████╗██║   ██║██╔██╗ ██║███████║██████╔╝   v{}
 ╚════██║██║   ██║██║╚██╗██║██╔══██║██╔══██╗
 ███████║╚██████╔╝██║ ╚████║██║  ██║██║  ██║
 ╚══════╝ ╚═════╝ ╚═╝  ╚═══╝╚═╝  ╚═╝╚═╝  ╚═╝
"#,
        env!("CARGO_PKG_VERSION")
    );

    tracing::info!("{}", banner);
}
