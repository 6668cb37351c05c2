/// The whole UI: a static page that drives the JSON API with fetch calls.
pub const CHAT_PAGE: &str = r#"<!doctype html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>Construction AI Assistant</title>
<style>
  body { background: #f4f6f7; font-family: system-ui, sans-serif; margin: 0; }
  .chat-container {
    max-width: 700px; margin: 24px auto; padding: 15px;
    border-radius: 12px; background: #ffffff;
    box-shadow: 0 4px 15px rgba(0,0,0,0.1);
  }
  .header { text-align: center; margin-bottom: 15px; }
  .header h1 { margin: 0; font-size: 1.5rem; }
  .header p { margin: 4px 0 0; color: #666; }
  .messages { min-height: 200px; }
  .user-bubble {
    text-align: right; background: #3498db; color: white;
    padding: 10px; border-radius: 15px; margin: 5px 0 5px auto;
    display: block; max-width: 70%; width: fit-content;
  }
  .bot-bubble {
    text-align: left; background: #2ecc71; color: white;
    padding: 10px; border-radius: 15px; margin: 5px auto 5px 0;
    display: block; max-width: 70%; width: fit-content;
  }
  .hint { color: #8a6d3b; background: #fcf8e3; padding: 6px 10px; border-radius: 8px; margin: 5px 0; }
  .error { color: #a94442; background: #f2dede; padding: 6px 10px; border-radius: 8px; margin: 5px 0; }
  form { display: flex; gap: 8px; margin-top: 12px; }
  input[type=text] { flex: 1; padding: 10px; border: 1px solid #ccc; border-radius: 8px; }
  button { padding: 10px 18px; border: 0; border-radius: 8px; background: #3498db; color: white; cursor: pointer; }
  button:disabled { background: #aaa; }
</style>
</head>
<body>
<div class="chat-container">
  <div class="header">
    <h1>Construction AI Assistant</h1>
    <p>Your smart civil engineering helper</p>
  </div>
  <div class="messages" id="messages"></div>
  <div id="notice"></div>
  <form id="chat-form">
    <input type="text" id="input" placeholder="Type your question" autocomplete="off">
    <button type="submit" id="send">Send</button>
  </form>
</div>
<script>
const messages = document.getElementById('messages');
const notice = document.getElementById('notice');
const form = document.getElementById('chat-form');
const input = document.getElementById('input');
const send = document.getElementById('send');
let sessionId = null;
let awaiting = false;

function bubble(role, text) {
  const div = document.createElement('div');
  div.className = role === 'user' ? 'user-bubble' : 'bot-bubble';
  div.textContent = text;
  messages.appendChild(div);
  div.scrollIntoView();
}

function note(cls, text) {
  notice.innerHTML = '';
  if (!text) return;
  const div = document.createElement('div');
  div.className = cls;
  div.textContent = text;
  notice.appendChild(div);
}

async function init() {
  const res = await fetch('/api/sessions', { method: 'POST' });
  sessionId = (await res.json()).id;
}

async function requestReply(path, options) {
  send.disabled = true;
  try {
    const res = await fetch(path, options);
    const body = await res.json();
    if (!res.ok) {
      awaiting = res.status === 502;
      note('error', body.error + (awaiting ? ' (press Send to retry)' : ''));
      return;
    }
    awaiting = false;
    if (body.corrected) note('hint', 'Did you mean: ' + body.corrected + '?');
    else note();
    bubble('assistant', body.reply.content);
  } finally {
    send.disabled = false;
  }
}

form.addEventListener('submit', async (e) => {
  e.preventDefault();
  if (!sessionId) await init();
  if (awaiting) {
    await requestReply('/api/sessions/' + sessionId + '/reply', { method: 'POST' });
    return;
  }
  const text = input.value.trim();
  if (!text) return;
  bubble('user', text);
  input.value = '';
  await requestReply('/api/sessions/' + sessionId + '/messages', {
    method: 'POST',
    headers: { 'Content-Type': 'application/json' },
    body: JSON.stringify({ message: text }),
  });
});

init();
</script>
</body>
</html>
"#;
