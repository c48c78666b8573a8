//  ██████╗  █████╗ ███████╗███████╗██╗███╗   ██╗ ██████╗
//  ██╔══██╗██╔══██╗██╔════╝██╔════╝██║████╗  ██║██╔════╝
//  ██████╔╝███████║███████╗███████╗██║██╔██╗ ██║██║  ███╗
//  ██╔═══╝ ██╔══██║╚════██║╚════██║██║██║╚██╗██║██║   ██║
//  ██║     ██║  ██║███████║███████║██║██║ ╚████║╚██████╔╝
//  ╚═╝     ╚═╝  ╚═╝╚══════╝╚══════╝╚═╝╚═╝  ╚═══╝ ╚═════╝

#[cfg(test)]
mod passing {
    use navio::translator::translate;

    fn apple(url: &str) -> Option<String> {
        translate(url)
    }

    #[test]
    fn query_parameter() {
        assert_eq!(
            apple("https://www.google.com/maps?q=Eiffel+Tower").as_deref(),
            Some("https://maps.apple.com/?q=Eiffel%20Tower")
        );
    }

    #[test]
    fn query_falls_back_to_second_key() {
        assert_eq!(
            apple("https://www.google.com/maps/search/?api=1&q=&query=Louvre").as_deref(),
            Some("https://maps.apple.com/?q=Louvre")
        );
    }

    #[test]
    fn first_occurrence_of_a_key_wins() {
        assert_eq!(
            apple("https://maps.google.com/?q=First&q=Second").as_deref(),
            Some("https://maps.apple.com/?q=First")
        );
    }

    #[test]
    fn coordinates_with_query() {
        assert_eq!(
            apple("https://www.google.com/maps/@40.7128,-74.0060,12z?q=Place").as_deref(),
            Some("https://maps.apple.com/?ll=40.7128,-74.0060&q=Place")
        );
    }

    #[test]
    fn coordinates_without_query() {
        assert_eq!(
            apple("https://www.google.com/maps/@-33.8688,151.2093,14z").as_deref(),
            Some("https://maps.apple.com/?ll=-33.8688,151.2093")
        );
    }

    #[test]
    fn place_path() {
        assert_eq!(
            apple("https://www.google.com/maps/place/Golden+Gate+Bridge/@37.8,-122.4,15z")
                .as_deref(),
            Some("https://maps.apple.com/?ll=37.8,-122.4&q=Golden%20Gate%20Bridge")
        );
    }

    #[test]
    fn place_path_is_percent_decoded_then_reencoded() {
        assert_eq!(
            apple("https://www.google.com/maps/place/Caf%C3%A9+de+Flore/data=!3m1").as_deref(),
            Some("https://maps.apple.com/?q=Caf%C3%A9%20de%20Flore")
        );
    }

    #[test]
    fn directions_parameters() {
        assert_eq!(
            apple("https://www.google.com/maps/dir/?api=1&destination=A&origin=B").as_deref(),
            Some("https://maps.apple.com/?saddr=B&daddr=A")
        );
        assert_eq!(
            apple("https://maps.google.com/maps?saddr=Home&daddr=Work").as_deref(),
            Some("https://maps.apple.com/?saddr=Home&daddr=Work")
        );
    }

    #[test]
    fn directions_path_with_two_parts() {
        assert_eq!(
            apple("https://www.google.com/maps/dir/Berlin/Hamburg/").as_deref(),
            Some("https://maps.apple.com/?saddr=Berlin&daddr=Hamburg")
        );
    }

    #[test]
    fn directions_path_with_one_part() {
        assert_eq!(
            apple("https://www.google.com/maps/dir/Hamburg").as_deref(),
            Some("https://maps.apple.com/?daddr=Hamburg")
        );
    }

    #[test]
    fn current_location_origin_is_suppressed() {
        assert_eq!(
            apple("https://www.google.com/maps/dir/?api=1&origin=Current+Location&destination=Paris")
                .as_deref(),
            Some("https://maps.apple.com/?daddr=Paris")
        );
        assert_eq!(
            apple("https://www.google.com/maps/dir/My+Location/Paris").as_deref(),
            Some("https://maps.apple.com/?daddr=Paris")
        );
    }

    #[test]
    fn search_path() {
        assert_eq!(
            apple("https://www.google.com/maps/search/coffee+shops/@47.6,-122.3,13z").as_deref(),
            Some("https://maps.apple.com/?ll=47.6,-122.3&q=coffee%20shops")
        );
    }

    #[test]
    fn reserved_characters_are_escaped() {
        assert_eq!(
            apple("https://maps.google.com/?q=A%26B%3DC").as_deref(),
            Some("https://maps.apple.com/?q=A%26B%3DC")
        );
    }

    #[test]
    fn deterministic() {
        let url = "https://www.google.com/maps/place/Tower+Bridge/@51.5055,-0.0754,17z";
        assert_eq!(apple(url), apple(url));
    }
}

//  ███████╗ █████╗ ██╗██╗     ██╗███╗   ██╗ ██████╗
//  ██╔════╝██╔══██╗██║██║     ██║████╗  ██║██╔════╝
//  █████╗  ███████║██║██║     ██║██╔██╗ ██║██║  ███╗
//  ██╔══╝  ██╔══██║██║██║     ██║██║╚██╗██║██║   ██║
//  ██║     ██║  ██║██║███████╗██║██║ ╚████║╚██████╔╝
//  ╚═╝     ╚═╝  ╚═╝╚═╝╚══════╝╚═╝╚═╝  ╚═══╝ ╚═════╝

#[cfg(test)]
mod failing {
    use navio::translator::translate;

    #[test]
    fn not_a_url() {
        assert_eq!(translate(""), None);
        assert_eq!(translate("maps.google.com/?q=x"), None);
    }

    #[test]
    fn relative_url() {
        assert_eq!(translate("/maps/place/Somewhere"), None);
    }

    #[test]
    fn nothing_recognisable() {
        assert_eq!(translate("https://www.google.com/maps"), None);
        assert_eq!(translate("https://www.google.com/maps?hl=en&authuser=0"), None);
    }

    #[test]
    fn malformed_escape_in_place_path() {
        assert_eq!(translate("https://www.google.com/maps/place/100%25%ZZ/"), None);
    }

    #[test]
    fn invalid_utf8_in_search_path() {
        assert_eq!(translate("https://www.google.com/maps/search/%FF%FE"), None);
    }
}
