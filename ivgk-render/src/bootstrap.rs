//! In-browser fallback bootstrap
//!
//! Pre-rendered fallback sections travel in a `<template>` element. The
//! bootstrap script inserts them with the same policy as the server-side
//! synthesizer once the template's own script has run, then wires the QR
//! download and copy-link buttons.

use crate::html::Element;

pub const FALLBACK_TEMPLATE_ID: &str = "vcard-fallback-sections";

pub const BOOTSTRAP_SCRIPT: &str = r#"(function () {
  var MARKER = 'data-vcard-rendered';
  function run() {
    var body = document.body;
    if (!body || body.hasAttribute(MARKER)) return;
    var source = document.getElementById('vcard-fallback-sections');
    if (!source || document.querySelector('[data-vcard-sections-rendered]')) {
      body.setAttribute(MARKER, 'true');
      return;
    }
    var container = document.querySelector('[data-dynamic-sections]') ||
      document.querySelector('main') || document.querySelector('.content') || body;
    var previous = container.querySelector('[data-dynamic-anchor]');
    var sections = Array.prototype.slice.call(source.content.children);
    sections.forEach(function (section) {
      var node = document.importNode(section, true);
      if (previous && previous.parentNode) {
        previous.parentNode.insertBefore(node, previous.nextSibling);
        previous = node;
      } else {
        container.appendChild(node);
      }
    });
    body.setAttribute(MARKER, 'true');
  }
  function copy(url) {
    function fallback() { window.alert('Copy this link: ' + url); }
    if (navigator.clipboard && navigator.clipboard.writeText) {
      navigator.clipboard.writeText(url).then(function () {
        window.alert('Link copied to clipboard');
      }, fallback);
    } else {
      fallback();
    }
  }
  document.addEventListener('click', function (event) {
    var target = event.target;
    if (!target || !target.closest) return;
    var download = target.closest('[data-vcard-qr-download]');
    if (download) {
      var link = document.createElement('a');
      link.href = download.getAttribute('data-src');
      link.download = download.getAttribute('data-vcard-qr-download') || 'vcard-qr.png';
      document.body.appendChild(link);
      link.click();
      link.remove();
      return;
    }
    var copyButton = target.closest('[data-vcard-qr-copy]');
    if (copyButton) copy(copyButton.getAttribute('data-vcard-qr-copy'));
  });
  if (document.readyState === 'loading') {
    document.addEventListener('DOMContentLoaded', run);
  } else {
    run();
  }
})();"#;

/// `<template>` holding the sections plus the bootstrap `<script>`
pub fn fallback_block(sections_html: &str) -> String {
    let template = Element::new("template")
        .attr("id", FALLBACK_TEMPLATE_ID)
        .raw(sections_html);
    let script = Element::new("script").raw(BOOTSTRAP_SCRIPT);
    format!("{}{}", template.to_html(), script.to_html())
}
