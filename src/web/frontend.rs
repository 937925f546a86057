//! Embedded CSS and JS for the portfolio page.
//!
//! Both are compiled into the binary as string constants and inlined into the
//! document by [`crate::render::page`]. No external assets, no build tools.
//!
//! The script is the interaction layer: hover effects, image fallbacks, the
//! panel's visual classes and the calls into `/api/panel/*`, which holds the
//! authoritative panel state. When the page is opened without the server the
//! API calls fail and the panel degrades to its placeholders.

/// Page stylesheet.
pub const STYLESHEET: &str = r##":root {
  --bg: #f4f6f8;
  --surface: #ffffff;
  --border: #dde3e8;
  --text: #2c3e50;
  --text-muted: #7f8c8d;
  --accent: #3498db;
  --important: #c0392b;
  --radius: 12px;
  --font: -apple-system, BlinkMacSystemFont, 'Segoe UI', Helvetica, Arial, sans-serif;
  --mono: 'SF Mono', 'Cascadia Code', 'Fira Code', monospace;
}

* { margin: 0; padding: 0; box-sizing: border-box; }
body {
  background: var(--bg);
  color: var(--text);
  font-family: var(--font);
  line-height: 1.5;
}

.page-header {
  display: flex;
  align-items: center;
  justify-content: space-between;
  gap: 16px;
  max-width: 1200px;
  margin: 0 auto;
  padding: 32px 24px 16px;
}
.page-header h1 { font-size: 28px; font-weight: 600; }
#search {
  padding: 8px 12px;
  border: 1px solid var(--border);
  border-radius: 8px;
  min-width: 240px;
  font: inherit;
}

/* Cards */
.cards-container {
  display: grid;
  grid-template-columns: repeat(auto-fill, minmax(280px, 1fr));
  gap: 24px;
  max-width: 1200px;
  margin: 0 auto;
  padding: 16px 24px 48px;
}
.card {
  background: var(--surface);
  border-radius: var(--radius);
  overflow: hidden;
  box-shadow: 0 4px 15px rgba(0,0,0,0.08);
  transition: all 0.3s ease;
  animation: fadeIn 0.5s ease;
}
.card-image { height: 180px; background: #ecf0f1; }
.card-image img {
  width: 100%;
  height: 100%;
  object-fit: cover;
  opacity: 0;
  transition: opacity 0.3s ease;
}
.image-placeholder {
  width: 100%;
  height: 100%;
  background: linear-gradient(45deg, #ecf0f1, #bdc3c7);
  display: flex;
  align-items: center;
  justify-content: center;
  color: var(--text-muted);
  font-size: 14px;
  text-align: center;
  padding: 20px;
}
.card-content { padding: 20px; }
.card-content h3 { font-size: 18px; margin-bottom: 8px; }
.card-content p { color: var(--text-muted); margin-bottom: 12px; }
.card-content p.note { font-size: 13px; font-style: italic; }
.card-content p.important { color: var(--important); font-size: 13px; }
.btn-visualizar {
  background: var(--accent);
  color: #fff;
  border: none;
  border-radius: 8px;
  padding: 8px 16px;
  cursor: pointer;
  font: inherit;
}
.btn-visualizar:hover { filter: brightness(1.1); }

.loading, .error, .empty {
  grid-column: 1 / -1;
  text-align: center;
  padding: 48px 16px;
  color: var(--text-muted);
}
.error { color: var(--important); text-align: left; white-space: normal; }

/* Panel */
.painel-overlay {
  position: fixed;
  inset: 0;
  background: rgba(0,0,0,0.5);
  opacity: 0;
  pointer-events: none;
  transition: opacity 0.3s ease;
  z-index: 900;
}
.painel-overlay.ativo { opacity: 1; pointer-events: auto; }
.painel-visualizacao {
  position: fixed;
  top: 5vh;
  left: 50%;
  width: min(1000px, 92vw);
  max-height: 90vh;
  transform: translate(-50%, 20px) scale(0.98);
  opacity: 0;
  pointer-events: none;
  background: var(--surface);
  border-radius: var(--radius);
  box-shadow: 0 20px 60px rgba(0,0,0,0.3);
  transition: all 0.4s ease;
  display: flex;
  flex-direction: column;
  z-index: 1000;
}
.painel-visualizacao.aberto {
  transform: translate(-50%, 0) scale(1);
  opacity: 1;
  pointer-events: auto;
}
.painel-header {
  display: flex;
  align-items: center;
  justify-content: space-between;
  padding: 16px 20px;
  border-bottom: 1px solid var(--border);
}
.painel-titulo { font-weight: 600; text-transform: uppercase; letter-spacing: 0.04em; }
.btn-fechar {
  background: none;
  border: none;
  font-size: 28px;
  line-height: 1;
  cursor: pointer;
  color: var(--text-muted);
}
.painel-conteudo { overflow: auto; padding: 20px; }
.conteudo-recurso { min-height: 200px; text-align: center; }
.conteudo-recurso.iframe-loading { background: #fafbfc; }
.em-breve {
  display: flex;
  align-items: center;
  justify-content: center;
  min-height: 200px;
  font-size: 22px;
  color: var(--text-muted);
}
.panel-frame {
  width: 100%;
  height: 70vh;
  min-height: 500px;
  border: none;
  border-radius: 10px;
  box-shadow: 0 4px 15px rgba(0,0,0,0.1);
  background: white;
  opacity: 0;
  transition: opacity 0.3s ease;
}
.panel-text {
  text-align: left;
  white-space: pre-wrap;
  font-family: var(--mono);
  font-size: 13px;
  margin: 0;
}

@keyframes fadeIn {
  from { opacity: 0; transform: translateY(8px); }
  to { opacity: 1; transform: translateY(0); }
}
"##;

/// Page script.
pub const SCRIPT: &str = r##"(function () {
  'use strict';

  const body = document.body;
  const openDelay = Number(body.dataset.openDelay || 100);
  const clearDelay = Number(body.dataset.clearDelay || 500);
  const container = document.getElementById('cards-container');
  const panel = document.getElementById('painel-visualizacao');
  const overlay = document.getElementById('painel-overlay');
  const titulo = document.getElementById('painel-titulo');
  const conteudo = document.getElementById('conteudo-recurso');
  const COMING_SOON = '<div class="em-breve">Coming soon</div>';
  const UNAVAILABLE = '<div class="em-breve">Content unavailable</div>';

  let requestSeq = 0;
  let clearTimer = null;

  async function api(method, path, payload) {
    const init = { method };
    if (payload !== undefined) {
      init.headers = { 'Content-Type': 'application/json' };
      init.body = JSON.stringify(payload);
    }
    const resp = await fetch(path, init);
    if (!resp.ok) {
      let message = 'HTTP ' + resp.status + ' - ' + resp.statusText;
      try {
        const body = await resp.json();
        if (body && body.error) { message = body.error; }
      } catch (_) { /* not JSON */ }
      throw new Error(message);
    }
    return resp.json();
  }

  // -- Cards ---------------------------------------------------------------

  function showImagePlaceholder(img) {
    img.style.display = 'none';
    const template = document.getElementById('image-placeholder');
    img.parentNode.insertAdjacentHTML('beforeend', template.innerHTML);
  }

  function initializeCards() {
    container.querySelectorAll('.card').forEach(function (card) {
      card.addEventListener('mouseenter', function () {
        card.style.transform = 'translateY(-5px) scale(1.02)';
      });
      card.addEventListener('mouseleave', function () {
        card.style.transform = 'translateY(0) scale(1)';
      });

      const button = card.querySelector('.btn-visualizar');
      if (button) {
        button.addEventListener('click', function (e) {
          e.preventDefault();
          e.stopPropagation();
          openPanel(button.dataset.resource);
        });
      }

      const img = card.querySelector('.card-image img');
      if (img) {
        if (img.complete && img.naturalWidth === 0) {
          showImagePlaceholder(img);
        } else {
          img.addEventListener('error', function () { showImagePlaceholder(img); }, { once: true });
          img.addEventListener('load', function () { img.style.opacity = '1'; });
          if (img.complete) { img.style.opacity = '1'; }
        }
      }
    });
  }

  async function loadCards() {
    container.innerHTML = '<div class="loading">Loading resources...</div>';
    try {
      const result = await api('POST', '/api/reload');
      container.innerHTML = result.html;
      initializeCards();
      return result.outcome;
    } catch (err) {
      console.error('failed to load resources', err);
      container.innerHTML = '<div class="error">Error: ' + err.message + '</div>';
      return null;
    }
  }

  async function getAvailableResources() {
    const result = await api('GET', '/api/resources');
    return result.resources;
  }

  function filterResources(searchTerm) {
    const term = (searchTerm || '').toLowerCase();
    container.querySelectorAll('.card').forEach(function (card) {
      const title = card.querySelector('h3').textContent.toLowerCase();
      const description = card.querySelector('p').textContent.toLowerCase();
      card.style.display = (title.includes(term) || description.includes(term)) ? '' : 'none';
    });
  }

  function scrollTo(target) {
    const el = typeof target === 'string'
      ? document.getElementById('card-' + target)
      : target;
    if (el) {
      el.scrollIntoView({ behavior: 'smooth', block: 'start' });
    }
  }

  // -- Panel ---------------------------------------------------------------

  function isOpen() {
    return overlay.classList.contains('ativo');
  }

  async function openPanel(resourceId) {
    const request = ++requestSeq;
    if (clearTimer) {
      clearTimeout(clearTimer);
      clearTimer = null;
    }

    const card = container.querySelector('.card[data-resource-id="' + CSS.escape(resourceId) + '"]');
    titulo.textContent = card ? card.querySelector('h3').textContent : resourceId;
    conteudo.innerHTML = 'Loading...';
    conteudo.classList.remove('iframe-loading');
    overlay.classList.add('ativo');
    body.style.overflow = 'hidden';
    setTimeout(function () {
      if (request === requestSeq && isOpen()) { panel.classList.add('aberto'); }
    }, openDelay);

    let snapshot = null;
    try {
      snapshot = await api('POST', '/api/panel/open', { id: resourceId });
    } catch (err) {
      console.error('failed to load panel content for ' + resourceId, err);
    }

    // Closed or reopened while the request was in flight.
    if (request !== requestSeq || !isOpen()) { return; }

    if (!snapshot) {
      conteudo.innerHTML = COMING_SOON;
      return;
    }
    conteudo.innerHTML = snapshot.html;

    const frame = conteudo.querySelector('iframe');
    if (frame) {
      conteudo.classList.add('iframe-loading');
      frame.addEventListener('load', function () {
        conteudo.classList.remove('iframe-loading');
        setTimeout(function () { frame.style.opacity = '1'; }, 100);
        reportFrame(snapshot.ticket, true);
      });
      frame.addEventListener('error', function () {
        conteudo.classList.remove('iframe-loading');
        reportFrame(snapshot.ticket, false).then(function (s) {
          if (request === requestSeq) { conteudo.innerHTML = s ? s.html : UNAVAILABLE; }
        });
      });
    }
  }

  function reportFrame(ticket, loaded) {
    return api('POST', '/api/panel/frame', { ticket: ticket, loaded: loaded })
      .catch(function () { return null; });
  }

  function closePanel(trigger) {
    if (!isOpen()) { return false; }
    requestSeq++;
    panel.classList.remove('aberto');
    overlay.classList.remove('ativo');
    body.style.overflow = '';
    clearTimer = setTimeout(function () {
      conteudo.innerHTML = 'Loading...';
      conteudo.classList.remove('iframe-loading');
      titulo.textContent = 'Viewing resource';
      clearTimer = null;
    }, clearDelay);
    api('POST', '/api/panel/close', { trigger: trigger || 'button' }).catch(function () {});
    return true;
  }

  document.getElementById('btn-fechar-painel').addEventListener('click', function () { closePanel('button'); });
  overlay.addEventListener('click', function () { closePanel('overlay'); });
  document.addEventListener('keydown', function (e) {
    if (e.key === 'Escape' && isOpen()) { closePanel('cancel-key'); }
  });
  document.getElementById('search').addEventListener('input', function (e) {
    filterResources(e.target.value);
  });

  initializeCards();

  window.Vitrine = {
    loadCards: loadCards,
    reloadResources: loadCards,
    filterResources: filterResources,
    scrollTo: scrollTo,
    getAvailableResources: getAvailableResources,
    openPanel: openPanel,
    closePanel: closePanel
  };
})();
"##;
