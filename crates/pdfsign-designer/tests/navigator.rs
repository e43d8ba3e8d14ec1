use pdfsign_designer::PageNavigator;

#[test]
fn test_out_of_range_pages_refused() {
    let mut nav = PageNavigator::new(5, 1.5).unwrap();
    assert!(nav.go_to_page(3));

    assert!(!nav.go_to_page(0));
    assert_eq!(nav.current_page(), 3);
    assert!(!nav.go_to_page(6));
    assert_eq!(nav.current_page(), 3);
}

#[test]
fn test_same_page_needs_no_render() {
    let mut nav = PageNavigator::new(5, 1.5).unwrap();
    assert!(!nav.go_to_page(1));
}

#[test]
fn test_walk_whole_document() {
    let mut nav = PageNavigator::new(4, 1.0).unwrap();
    let mut visited = vec![nav.current_page()];
    while nav.next() {
        visited.push(nav.current_page());
    }
    assert_eq!(visited, vec![1, 2, 3, 4]);
    assert_eq!(nav.page_index(), 3);

    while nav.previous() {}
    assert_eq!(nav.current_page(), 1);
    assert!(!nav.previous());
}

#[test]
fn test_invalid_scale_rejected() {
    assert!(PageNavigator::new(1, 0.0).unwrap_err().is_invalid_dimensions());
    assert!(PageNavigator::new(1, f64::INFINITY).is_err());
}
