//  ██████╗  █████╗ ███████╗███████╗██╗███╗   ██╗ ██████╗
//  ██╔══██╗██╔══██╗██╔════╝██╔════╝██║████╗  ██║██╔════╝
//  ██████╔╝███████║███████╗███████╗██║██╔██╗ ██║██║  ███╗
//  ██╔═══╝ ██╔══██║╚════██║╚════██║██║██║╚██╗██║██║   ██║
//  ██║     ██║  ██║███████║███████║██║██║ ╚████║╚██████╔╝
//  ╚═╝     ╚═╝  ╚═╝╚══════╝╚══════╝╚═╝╚═╝  ╚═══╝ ╚═════╝

#[cfg(test)]
mod passing {
    use interlinear::core::format_output_path;

    #[test]
    fn as_is() {
        let final_destination =
            format_output_path("/home/username/Downloads/website.html", Some(""), "es");

        assert_eq!(final_destination, "/home/username/Downloads/website.html");
    }

    #[test]
    fn substitute_title_and_lang() {
        let final_destination = format_output_path(
            "/home/username/Downloads/%title%.%lang%.html",
            Some("Document Title"),
            "es",
        );

        assert_eq!(
            final_destination,
            "/home/username/Downloads/Document Title.es.html"
        );
    }

    #[test]
    fn substitute_title_multi() {
        let final_destination = format_output_path(
            "/home/username/Downloads/%title%/%title%.html",
            Some("Document Title"),
            "es",
        );

        assert_eq!(
            final_destination,
            "/home/username/Downloads/Document Title/Document Title.html"
        );
    }

    #[test]
    fn sanitize() {
        let final_destination = format_output_path(
            r#"/home/username/Downloads/<>:"|?/%title%.html"#,
            Some(r#"/\<>:"|?"#),
            "es",
        );

        assert_eq!(
            final_destination,
            r#"/home/username/Downloads/<>:"|?/__[] - -.html"#
        );
    }

    #[test]
    fn sanitize_lang() {
        let final_destination = format_output_path("out-%lang%.html", None, "../zh");

        assert_eq!(final_destination, "out-.._zh.html");
    }

    #[test]
    fn level_up() {
        let final_destination = format_output_path("../%title%.html", Some(".Title"), "es");

        assert_eq!(final_destination, r#"../Title.html"#);
    }

    #[test]
    fn missing_title() {
        let final_destination = format_output_path("%title%page.html", None, "es");

        assert_eq!(final_destination, "page.html");
    }

    #[test]
    fn file_name_extension() {
        let final_destination = format_output_path("%title%.%extension%", Some("Title"), "es");

        assert_eq!(final_destination, r#"Title.html"#);
    }

    #[test]
    fn file_name_extension_short() {
        let final_destination = format_output_path("%title%.%ext%", Some("Title"), "es");

        assert_eq!(final_destination, r#"Title.htm"#);
    }

    #[test]
    fn timestamp_has_no_colons() {
        let final_destination = format_output_path("%timestamp%.html", None, "es");

        assert!(!final_destination.contains(':'));
        assert!(final_destination.ends_with("Z.html"));
    }
}
