//! Self-contained interactive HTML rendering of a [`PropertyGraph`].
//!
//! The document carries its own force layout script, so it opens offline
//! and can be served as a plain static file.

use std::collections::HashMap;

use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::VisualizationResult;
use crate::graph::PropertyGraph;

/// Node colours, assigned to categories in first-seen order.
const PALETTE: &[&str] = &[
    "#4e79a7", "#f28e2b", "#e15759", "#76b7b2", "#59a14f", "#edc948", "#b07aa1", "#ff9da7",
    "#9c755f", "#bab0ac",
];

#[derive(Serialize)]
struct RenderNode<'a> {
    id: &'a str,
    label: &'a str,
    category: &'a str,
    color: &'static str,
    properties: &'a Map<String, Value>,
}

#[derive(Serialize)]
struct RenderEdge<'a> {
    id: &'a str,
    source: &'a str,
    target: &'a str,
    label: &'a str,
    properties: &'a Map<String, Value>,
}

#[derive(Serialize)]
struct RenderLegend<'a> {
    category: &'a str,
    color: &'static str,
}

#[derive(Serialize)]
struct RenderData<'a> {
    nodes: Vec<RenderNode<'a>>,
    edges: Vec<RenderEdge<'a>>,
    legend: Vec<RenderLegend<'a>>,
}

/// Render the graph into a complete HTML document of the given height.
pub fn render(graph: &PropertyGraph, title: &str, height_px: u32) -> VisualizationResult<String> {
    let mut colors: HashMap<&str, &'static str> = HashMap::new();
    let mut legend = Vec::new();

    for node in graph.nodes() {
        if !colors.contains_key(node.category.as_str()) {
            let color = PALETTE[colors.len() % PALETTE.len()];
            colors.insert(node.category.as_str(), color);
            legend.push(RenderLegend {
                category: node.category.as_str(),
                color,
            });
        }
    }

    let data = RenderData {
        nodes: graph
            .nodes()
            .iter()
            .map(|n| RenderNode {
                id: &n.id,
                label: &n.label,
                category: &n.category,
                color: colors.get(n.category.as_str()).copied().unwrap_or(PALETTE[0]),
                properties: &n.properties,
            })
            .collect(),
        edges: graph
            .edges()
            .iter()
            .map(|e| RenderEdge {
                id: &e.id,
                source: &e.source,
                target: &e.target,
                label: &e.label,
                properties: &e.properties,
            })
            .collect(),
        legend,
    };

    let json = script_safe(&serde_json::to_string(&data)?);

    Ok(TEMPLATE
        .replace("__TITLE__", &escape_html(title))
        .replace("__HEIGHT__", &height_px.to_string())
        .replace("__GRAPH_DATA__", &json))
}

/// Keep embedded JSON from closing the surrounding script element.
fn script_safe(json: &str) -> String {
    json.replace("</", "<\\/").replace("<!--", "<\\!--")
}

fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

const TEMPLATE: &str = r##"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width,initial-scale=1">
<title>__TITLE__</title>
<style>
body{margin:0;font-family:-apple-system,BlinkMacSystemFont,'Segoe UI',sans-serif;font-size:12px;background:#fafafa;color:#222}
#wrap{position:relative;width:100%;height:__HEIGHT__px;overflow:hidden;border:1px solid #ddd;background:#fff}
#graph{width:100%;height:100%;cursor:grab}
.edge{stroke:#999;stroke-width:1.4}
.edge-label{fill:#666;font-size:10px;text-anchor:middle;pointer-events:none}
.node circle{stroke:#fff;stroke-width:1.5;cursor:pointer}
.node text{fill:#222;pointer-events:none}
#legend{position:absolute;top:8px;left:8px;background:rgba(255,255,255,.9);border:1px solid #ddd;border-radius:4px;padding:6px 8px}
.lg{display:flex;align-items:center;gap:6px;margin:2px 0}
.lg i{width:10px;height:10px;border-radius:50%;display:inline-block}
#tip{position:absolute;display:none;max-width:260px;background:rgba(20,20,28,.95);color:#eee;border-radius:4px;padding:6px 8px;pointer-events:none;white-space:pre-wrap}
</style>
</head>
<body>
<div id="wrap">
<svg id="graph" xmlns="http://www.w3.org/2000/svg">
<defs><marker id="arrow" viewBox="0 0 10 10" refX="20" refY="5" markerWidth="6" markerHeight="6" orient="auto-start-reverse"><path d="M0,0L10,5L0,10z" fill="#999"/></marker></defs>
</svg>
<div id="legend"></div>
<div id="tip"></div>
</div>
<script>
(function(){
const data = __GRAPH_DATA__;
const NS = 'http://www.w3.org/2000/svg';
const svg = document.getElementById('graph');
const tip = document.getElementById('tip');
const W = svg.clientWidth || 960, H = __HEIGHT__;
const el = (tag, attrs) => { const e = document.createElementNS(NS, tag); for (const k in attrs) e.setAttribute(k, attrs[k]); return e; };
const byId = new Map();
data.nodes.forEach((n, i) => {
  const a = 2 * Math.PI * i / Math.max(1, data.nodes.length);
  n.x = W / 2 + 180 * Math.cos(a); n.y = H / 2 + 180 * Math.sin(a); n.vx = 0; n.vy = 0;
  byId.set(n.id, n);
});
const links = data.edges.filter(e => byId.has(e.source) && byId.has(e.target));
const edgeLayer = el('g', {}), nodeLayer = el('g', {});
svg.append(edgeLayer, nodeLayer);
const describe = (title, props) => title + Object.keys(props).map(k => '\n' + k + ': ' + JSON.stringify(props[k])).join('');
const showTip = (ev, text) => { tip.textContent = text; tip.style.display = 'block'; tip.style.left = (ev.offsetX + 12) + 'px'; tip.style.top = (ev.offsetY + 12) + 'px'; };
const hideTip = () => { tip.style.display = 'none'; };
links.forEach(e => {
  e.line = el('line', {'class': 'edge', 'marker-end': 'url(#arrow)'});
  e.text = el('text', {'class': 'edge-label'});
  e.text.textContent = e.label;
  e.line.addEventListener('mousemove', ev => showTip(ev, describe(e.label + ' (' + e.id + ')', e.properties)));
  e.line.addEventListener('mouseleave', hideTip);
  edgeLayer.append(e.line, e.text);
});
let dragged = null, alpha = 1;
data.nodes.forEach(n => {
  n.g = el('g', {'class': 'node'});
  const c = el('circle', {r: 9, fill: n.color});
  const t = el('text', {dx: 13, dy: 4});
  t.textContent = n.label;
  n.g.append(c, t);
  c.addEventListener('mousedown', () => { dragged = n; alpha = Math.max(alpha, 0.3); });
  c.addEventListener('mousemove', ev => showTip(ev, describe(n.label + ' [' + n.category + ']', n.properties)));
  c.addEventListener('mouseleave', hideTip);
  nodeLayer.append(n.g);
});
svg.addEventListener('mousemove', ev => { if (dragged) { dragged.x = ev.offsetX; dragged.y = ev.offsetY; dragged.vx = 0; dragged.vy = 0; } });
window.addEventListener('mouseup', () => { dragged = null; });
const legend = document.getElementById('legend');
data.legend.forEach(l => { const d = document.createElement('div'); d.className = 'lg'; const i = document.createElement('i'); i.style.background = l.color; d.append(i, document.createTextNode(l.category)); legend.append(d); });
function tick() {
  const nodes = data.nodes;
  for (let i = 0; i < nodes.length; i++) {
    for (let j = i + 1; j < nodes.length; j++) {
      const a = nodes[i], b = nodes[j];
      let dx = b.x - a.x, dy = b.y - a.y, d2 = dx * dx + dy * dy || 0.01;
      const f = 2200 / d2, d = Math.sqrt(d2);
      dx /= d; dy /= d;
      a.vx -= f * dx; a.vy -= f * dy; b.vx += f * dx; b.vy += f * dy;
    }
  }
  links.forEach(e => {
    const a = byId.get(e.source), b = byId.get(e.target);
    const dx = b.x - a.x, dy = b.y - a.y, d = Math.sqrt(dx * dx + dy * dy) || 0.01;
    const f = (d - 110) * 0.02;
    a.vx += f * dx / d; a.vy += f * dy / d; b.vx -= f * dx / d; b.vy -= f * dy / d;
  });
  nodes.forEach(n => {
    n.vx += (W / 2 - n.x) * 0.002; n.vy += (H / 2 - n.y) * 0.002;
    if (n !== dragged) { n.x += n.vx * alpha; n.y += n.vy * alpha; }
    n.vx *= 0.6; n.vy *= 0.6;
    n.x = Math.max(12, Math.min(W - 12, n.x)); n.y = Math.max(12, Math.min(H - 12, n.y));
  });
}
function draw() {
  links.forEach(e => {
    const a = byId.get(e.source), b = byId.get(e.target);
    e.line.setAttribute('x1', a.x); e.line.setAttribute('y1', a.y);
    e.line.setAttribute('x2', b.x); e.line.setAttribute('y2', b.y);
    e.text.setAttribute('x', (a.x + b.x) / 2); e.text.setAttribute('y', (a.y + b.y) / 2 - 3);
  });
  data.nodes.forEach(n => n.g.setAttribute('transform', 'translate(' + n.x + ',' + n.y + ')'));
}
function frame() {
  if (alpha > 0.005 || dragged) { tick(); alpha *= 0.99; }
  draw();
  requestAnimationFrame(frame);
}
frame();
})();
</script>
</body>
</html>
"##;
