//! Full page document around the card container.

use crate::render::{IMAGE_PLACEHOLDER_HTML, escape_html};
use crate::web::frontend::{SCRIPT, STYLESHEET};

/// Values the page script needs at runtime.
#[derive(Debug, Clone)]
pub struct PageSettings<'a> {
    pub title: &'a str,
    pub open_delay_ms: u64,
    pub clear_delay_ms: u64,
}

/// Render the complete HTML document.
///
/// `container` is the already-rendered inner markup of the card grid.
pub fn page_html(settings: &PageSettings<'_>, container: &str) -> String {
    let title = escape_html(settings.title);
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{title}</title>
<style>
{STYLESHEET}
</style>
</head>
<body data-open-delay="{open}" data-clear-delay="{clear}">
<header class="page-header">
  <h1>{title}</h1>
  <input id="search" type="search" placeholder="Filter resources..." autocomplete="off">
</header>
<main>
<div id="cards-container" class="cards-container">
{container}
</div>
</main>
<div id="painel-overlay" class="painel-overlay"></div>
<div id="painel-visualizacao" class="painel-visualizacao" role="dialog" aria-modal="true">
  <div class="painel-header">
    <div class="painel-titulo" id="painel-titulo">Viewing resource</div>
    <button class="btn-fechar" id="btn-fechar-painel" aria-label="Close">×</button>
  </div>
  <div class="painel-conteudo">
    <div class="conteudo-recurso" id="conteudo-recurso">Loading...</div>
  </div>
</div>
<template id="image-placeholder">{placeholder}</template>
<script>
{SCRIPT}
</script>
</body>
</html>
"#,
        open = settings.open_delay_ms,
        clear = settings.clear_delay_ms,
        placeholder = IMAGE_PLACEHOLDER_HTML,
    )
}
