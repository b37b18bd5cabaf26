use axum::response::Html;

#[utoipa::path(
    get,
    path = "/",
    responses(
        (status = 200, description = "Video library page HTML", content_type = "text/html")
    ),
    tag = "General"
)]
pub async fn root() -> Html<&'static str> {
    Html(
        r##"
        <!DOCTYPE html>
        <html lang="en">
        <head>
            <meta charset="UTF-8">
            <meta name="viewport" content="width=device-width, initial-scale=1.0">
            <title>VideoVault</title>
            <style>
                body {
                    max-width: 860px;
                    margin: 0 auto;
                    padding: 24px;
                    font-family: Arial, sans-serif;
                    background-color: #f0f0f0;
                    color: #333;
                }
                h1 { margin-bottom: 4px; }
                .hint { color: #666; margin-top: 0; }
                form, .video {
                    background: white;
                    border-radius: 8px;
                    padding: 16px;
                    margin-bottom: 12px;
                    box-shadow: 0 1px 3px rgba(0,0,0,0.1);
                }
                input[type=text] { width: 100%; padding: 6px; margin: 4px 0; box-sizing: border-box; }
                button {
                    padding: 6px 14px;
                    background-color: #007bff;
                    color: white;
                    border: none;
                    border-radius: 5px;
                    cursor: pointer;
                }
                button.danger { background-color: #dc3545; }
                .tags span {
                    background: #e7f1ff;
                    border-radius: 4px;
                    padding: 2px 8px;
                    margin-right: 4px;
                    font-size: 0.85em;
                }
                .meta { color: #666; font-size: 0.85em; }
                #error { color: #dc3545; }
            </style>
        </head>
        <body>
            <h1>VideoVault</h1>
            <p class="hint">Upload, browse, and manage your video library. <a href="/swagger-ui/">API docs</a></p>

            <form id="upload-form">
                <input type="file" id="file" accept="video/*" required>
                <input type="text" id="title" placeholder="Title (defaults to filename)">
                <input type="text" id="description" placeholder="Description">
                <input type="text" id="tags" placeholder="Tags, comma-separated">
                <button type="submit">Upload</button>
            </form>

            <p id="error"></p>
            <div id="library"></div>

            <script>
                let videos = [];

                async function refresh() {
                    const res = await fetch('/videos');
                    if (!res.ok) { showError('Failed to load library'); return; }
                    videos = await res.json();
                    render();
                }

                function showError(msg) {
                    document.getElementById('error').textContent = msg;
                }

                function render() {
                    const library = document.getElementById('library');
                    library.innerHTML = '';
                    for (const video of videos) {
                        const card = document.createElement('div');
                        card.className = 'video';

                        const title = document.createElement('h3');
                        title.textContent = video.title;
                        card.appendChild(title);

                        const player = document.createElement('video');
                        player.src = video.fileUrl;
                        player.controls = true;
                        player.width = 320;
                        card.appendChild(player);

                        const description = document.createElement('p');
                        description.textContent = video.description;
                        card.appendChild(description);

                        const tags = document.createElement('p');
                        tags.className = 'tags';
                        for (const tag of video.tags) {
                            const chip = document.createElement('span');
                            chip.textContent = tag;
                            tags.appendChild(chip);
                        }
                        card.appendChild(tags);

                        const meta = document.createElement('p');
                        meta.className = 'meta';
                        meta.textContent = video.fileName + ' | updated ' + video.updatedAt;
                        card.appendChild(meta);

                        const rename = document.createElement('button');
                        rename.textContent = 'Rename';
                        rename.onclick = async () => {
                            const next = prompt('New title', video.title);
                            if (next === null) return;
                            const res = await fetch('/videos/' + video.id, {
                                method: 'PATCH',
                                headers: { 'Content-Type': 'application/json' },
                                body: JSON.stringify({ title: next })
                            });
                            if (!res.ok) showError('Rename failed');
                            refresh();
                        };
                        card.appendChild(rename);

                        const remove = document.createElement('button');
                        remove.textContent = 'Delete';
                        remove.className = 'danger';
                        remove.style.marginLeft = '8px';
                        remove.onclick = async () => {
                            if (!confirm('Delete "' + video.title + '"?')) return;
                            const res = await fetch('/videos/' + video.id, { method: 'DELETE' });
                            if (!res.ok) showError('Delete failed');
                            refresh();
                        };
                        card.appendChild(remove);

                        library.appendChild(card);
                    }
                }

                document.getElementById('upload-form').onsubmit = async (event) => {
                    event.preventDefault();
                    showError('');
                    const form = new FormData();
                    form.append('file', document.getElementById('file').files[0]);
                    form.append('title', document.getElementById('title').value);
                    form.append('description', document.getElementById('description').value);
                    form.append('tags', document.getElementById('tags').value);
                    const res = await fetch('/videos', { method: 'POST', body: form });
                    if (!res.ok) {
                        const body = await res.json().catch(() => ({}));
                        showError(body.error || 'Upload failed');
                        return;
                    }
                    event.target.reset();
                    refresh();
                };

                refresh();
            </script>
        </body>
        </html>
    "##,
    )
}
