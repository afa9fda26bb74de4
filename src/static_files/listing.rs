//! Directory listing markup.

/// Renders one entry as a list item linking to itself.
///
/// Entries are ordered by this text, so it is also the sort key the
/// resolver uses.
pub fn list_item(name: &str) -> String {
    format!("  <li><a href='{0}'>{0}</a></li>", name)
}

/// Renders the listing page for `uri` from already sorted entry names.
pub fn render(uri: &str, entries: &[String]) -> String {
    let items: Vec<String> = entries.iter().map(|e| list_item(e)).collect();

    format!(
        "<!DOCTYPE html>\n\
         <html lang=\"en\">\n\
         <meta charset=\"UTF-8\">\n\
         <title>Directory listing: {uri}</title>\n\
         \n\
         <h1>Contents of {uri}:</h1>\n\
         \n\
         <ul>\n\
         {items}\n\
         </ul>\n",
        uri = uri,
        items = items.join("\n"),
    )
}
